use crate::support::{exit_on_error, load_config_or_exit, print_json_or_exit, read_text_or_exit};
use lml_kernel::{BLOCKED_PLACEHOLDER, GroundingRuleSet, evaluate};
use serde_json::json;

pub struct Args {
    pub text: Option<String>,
    pub file: Option<String>,
    pub indicators: Vec<String>,
    pub law_id: Option<String>,
    pub config: Option<String>,
    pub json: bool,
}

pub fn run(args: Args) {
    let config = load_config_or_exit(args.config.as_deref());

    // Command-line indicators replace the configured list; --law-id alone
    // relabels it.
    let rules = if !args.indicators.is_empty() {
        let law_id = args
            .law_id
            .unwrap_or_else(|| config.grounding.law_id().to_string());
        GroundingRuleSet::new(law_id, args.indicators).unwrap_or_else(|err| exit_on_error(err))
    } else if let Some(law_id) = args.law_id {
        GroundingRuleSet::new(law_id, config.grounding.indicators().to_vec())
            .unwrap_or_else(|err| exit_on_error(err))
    } else {
        config.grounding
    };

    let text = read_text_or_exit(args.text, args.file.as_deref());
    let decision = evaluate(&text, &rules);
    if decision.reason.is_configuration_degenerate() {
        tracing::warn!(
            law_id = rules.law_id(),
            "grounding rule set is empty; every text is blocked"
        );
    }
    let final_output = if decision.admitted {
        text.as_str()
    } else {
        BLOCKED_PLACEHOLDER
    };

    if args.json {
        let payload = json!({
            "lawId": rules.law_id(),
            "admitted": decision.admitted,
            "matchedIndicator": decision.matched_indicator,
            "reason": decision.reason,
            "reasonDescription": decision.reason.describe(),
            "finalOutput": final_output,
        });
        print_json_or_exit(&payload, "gate");
        return;
    }

    println!("lml gate");
    println!("  Law: {}", rules.law_id());
    println!(
        "  Decision: {}",
        if decision.admitted {
            "ADMISSIBLE"
        } else {
            "FORBIDDEN STATE"
        }
    );
    println!("  Reason: {}", decision.reason.describe());
    if let Some(indicator) = &decision.matched_indicator {
        println!("  Matched indicator: {indicator}");
    }
    println!("  Final output:");
    println!("{final_output}");
}
