use crate::support::{load_config_or_exit, print_json_or_exit};
use lml_kernel::{EnforcementSummary, Generator, enforce};
use serde_json::{Value, json};
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

/// Runs an external program with the prompt on stdin and takes its stdout
/// as the generated text.
struct CommandGenerator {
    label: String,
    program: String,
    args: Vec<String>,
}

impl CommandGenerator {
    /// Split a command line on whitespace. No shell is involved.
    fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            label: command_line.trim().to_string(),
            program,
            args: parts.collect(),
        })
    }
}

impl Generator for CommandGenerator {
    fn name(&self) -> &str {
        &self.label
    }

    fn generate(&self, prompt: &str) -> Result<String, String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| format!("failed to start: {err}"))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A generator may exit without reading its prompt.
            match stdin.write_all(prompt.as_bytes()) {
                Err(err) if err.kind() != ErrorKind::BrokenPipe => {
                    return Err(format!("failed to write prompt: {err}"));
                }
                _ => {}
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|err| format!("failed to collect output: {err}"))?;
        if !output.status.success() {
            return Err(format!(
                "exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        String::from_utf8(output.stdout).map_err(|err| format!("output is not UTF-8: {err}"))
    }
}

pub fn run(
    prompt: String,
    generators: Vec<String>,
    config_path: Option<String>,
    json_output: bool,
) {
    let config = load_config_or_exit(config_path.as_deref());
    let rules = &config.grounding;
    if rules.is_empty() {
        tracing::warn!(
            law_id = rules.law_id(),
            "grounding rule set is empty; every output will be blocked"
        );
    }

    let generators: Vec<CommandGenerator> = generators
        .iter()
        .map(|line| {
            CommandGenerator::parse(line).unwrap_or_else(|| {
                eprintln!("error: empty generator command");
                std::process::exit(1);
            })
        })
        .collect();

    let runs: Vec<_> = generators
        .iter()
        .map(|generator| {
            let run = enforce(generator, &prompt, rules);
            match &run {
                Ok(e) => tracing::info!(
                    generator = generator.name(),
                    admitted = e.decision.admitted,
                    "generator output gated"
                ),
                Err(err) => tracing::warn!(generator = generator.name(), %err, "generator failed"),
            }
            run
        })
        .collect();
    let summary = EnforcementSummary::from_runs(&runs);
    let consistency = summary.check();
    if let Err(err) = &consistency {
        tracing::error!(%err, "released output does not match gate decisions");
    }

    if json_output {
        let rows: Vec<Value> = generators
            .iter()
            .zip(&runs)
            .map(|(generator, run)| match run {
                Ok(e) => json!({
                    "generator": e.generator,
                    "rawOutput": e.raw_output,
                    "decision": e.decision,
                    "finalOutput": e.final_output(),
                }),
                Err(err) => json!({
                    "generator": generator.name(),
                    "error": err.to_string(),
                }),
            })
            .collect();
        let payload = json!({
            "prompt": prompt,
            "lawId": rules.law_id(),
            "runs": rows,
            "summary": summary,
            "forbiddenEmitted": summary.forbidden_emitted(),
        });
        print_json_or_exit(&payload, "enforce");
    } else {
        println!("lml enforce");
        println!("  Prompt: {prompt}");
        println!("  Law: {}", rules.law_id());
        for (generator, run) in generators.iter().zip(&runs) {
            println!("  Generator: {}", generator.name());
            match run {
                Ok(e) => {
                    println!(
                        "    Decision: {}",
                        if e.decision.admitted {
                            "ADMISSIBLE"
                        } else {
                            "FORBIDDEN STATE"
                        }
                    );
                    println!("    Reason: {}", e.decision.reason.describe());
                    println!("    Final output: {}", e.final_output().trim_end());
                }
                Err(err) => println!("    Error: {err}"),
            }
        }
        println!(
            "  Summary: tested={} admitted={} blocked={} failed={} emitted={}",
            summary.tested, summary.admitted, summary.blocked, summary.failed, summary.emitted
        );
        println!("  Forbidden states emitted: {}", summary.forbidden_emitted());
    }

    if let Err(err) = consistency {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if summary.failed > 0 {
        std::process::exit(1);
    }
}
