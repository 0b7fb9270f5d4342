use crate::support::{load_config_or_exit, print_json_or_exit};
use serde_json::json;

pub fn run(config_path: Option<String>, json_output: bool) {
    let config = load_config_or_exit(config_path.as_deref());

    if json_output {
        let payload = json!({
            "alphabet": config.alphabet,
            "grounding": config.grounding,
            "certification": {
                "bound": config.certification.bound,
                "maxDepth": config.certification.max_depth,
            },
        });
        print_json_or_exit(&payload, "rules");
        return;
    }

    println!("lml rules");
    println!("  Law: {}", config.grounding.law_id());
    println!("  Indicators: {}", config.grounding.len());
    for (idx, indicator) in config.grounding.indicators().iter().enumerate() {
        println!("    {}. {indicator}", idx + 1);
    }
    if config.grounding.is_empty() {
        println!("  Warning: empty rule set blocks every text");
    }
    println!(
        "  Alphabet: {} (distinguished: {})",
        config.alphabet.operations().join(", "),
        config.alphabet.distinguished()
    );
    println!(
        "  Certification defaults: bound={} max_depth={}",
        config.certification.bound, config.certification.max_depth
    );
}
