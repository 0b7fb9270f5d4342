use crate::support::print_json_or_exit;
use lml_kernel::{CertificationResult, verify_certificate};
use serde_json::json;
use std::fs;

pub fn run(certificate_path: String, json_output: bool) {
    let text = fs::read_to_string(&certificate_path).unwrap_or_else(|err| {
        eprintln!("error: failed to read certificate at {certificate_path}: {err}");
        std::process::exit(1);
    });
    let certificate = CertificationResult::from_json(&text).unwrap_or_else(|err| {
        eprintln!("error: failed to parse certificate at {certificate_path}: {err}");
        std::process::exit(1);
    });

    let outcome = verify_certificate(&certificate);
    let (result, message) = match &outcome {
        Ok(()) => ("verified", None),
        Err(err) => ("rejected", Some(err.to_string())),
    };

    if json_output {
        let payload = json!({
            "certificate": certificate_path,
            "certificateId": certificate.certificate_id,
            "result": result,
            "error": message,
        });
        print_json_or_exit(&payload, "verify");
    } else {
        println!("lml verify {certificate_path}");
        println!("  Certificate: {}", certificate.certificate_id);
        println!("  Result: {result}");
        if let Some(message) = &message {
            println!("  Error: {message}");
        }
    }

    if outcome.is_err() {
        std::process::exit(1);
    }
}
