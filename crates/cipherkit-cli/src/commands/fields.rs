use secrecy::ExposeSecret;
use serde_json::{Map, Value};

use cipherkit_core::FieldEncryptor;

use crate::app::AppContext;
use crate::cli::{FieldsArgs, FieldsCommand};
use crate::errors::CliError;
use crate::helpers::{parse_algorithm, read_input_string, read_new_password, read_password};
use crate::output::print_json;

pub fn handle_fields(ctx: &AppContext, command: &FieldsCommand) -> anyhow::Result<()> {
    let (args, encrypting) = match command {
        FieldsCommand::Encrypt(args) => (args, true),
        FieldsCommand::Decrypt(args) => (args, false),
    };

    let record = read_record(args)?;
    let aes = ctx.aes(parse_algorithm(args.algorithm.as_deref())?)?;
    let fields = FieldEncryptor::new(&aes);
    let names: Vec<&str> = args
        .fields
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect();
    if names.is_empty() {
        return Err(CliError::invalid_input("--fields must name at least one field").into());
    }

    let output = if encrypting {
        let password = read_new_password()?;
        fields.encrypt_fields(&record, &names, password.expose_secret())?
    } else {
        let password = read_password()?;
        fields.decrypt_fields(&record, &names, password.expose_secret())?
    };
    print_json(&output)
}

fn read_record(args: &FieldsArgs) -> anyhow::Result<Map<String, Value>> {
    let text = read_input_string(args.input.as_deref())?;
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CliError::invalid_input("Input must be a JSON object").into()),
        Err(e) => Err(CliError::invalid_input(format!("Input is not valid JSON: {}", e)).into()),
    }
}
