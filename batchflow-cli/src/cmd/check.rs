use std::path::Path;

use serde::Serialize;

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::person::{read_persons, PersonFileError};
use crate::OutputArgs;

#[derive(Serialize)]
struct CheckResult {
    valid: bool,
    rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn check_cmd(path: &Path, output: OutputArgs) -> i32 {
    match read_persons(path) {
        Ok(persons) => {
            let blank = persons.iter().filter(|p| p.name.trim().is_empty()).count();
            if output.format == OutputFormat::Text && !output.quiet {
                println!("ok: {} rows ({blank} without a name)", persons.len());
            } else {
                let result = CheckResult {
                    valid: true,
                    rows: persons.len(),
                    error: None,
                };
                print_result(output.format, output.quiet, &result);
            }
            exit_codes::SUCCESS
        }
        Err(e @ PersonFileError::Read { .. }) => {
            print_error(output.format, output.quiet, &e.to_string());
            exit_codes::RUNTIME_ERROR
        }
        Err(e) => {
            if output.format == OutputFormat::Text && !output.quiet {
                eprintln!("error: invalid person file: {e}");
            } else {
                let result = CheckResult {
                    valid: false,
                    rows: 0,
                    error: Some(e.to_string()),
                };
                print_result(output.format, output.quiet, &result);
            }
            exit_codes::VALIDATION_FAILED
        }
    }
}
