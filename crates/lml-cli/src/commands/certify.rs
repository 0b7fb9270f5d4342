use crate::support::{exit_on_error, group_thousands, load_config_or_exit, print_json_or_exit};
use lml_kernel::certify_with;

pub struct Args {
    pub alphabet_size: Option<i64>,
    pub bound: Option<i64>,
    pub max_depth: Option<i64>,
    pub workers: usize,
    pub depths: bool,
    pub config: Option<String>,
    pub json: bool,
}

pub fn run(args: Args) {
    let config = load_config_or_exit(args.config.as_deref());

    let mut request = config.certify_request();
    if let Some(alphabet_size) = args.alphabet_size {
        request.alphabet_size = alphabet_size;
    }
    if let Some(bound) = args.bound {
        request.bound = bound;
    }
    if let Some(max_depth) = args.max_depth {
        request.max_depth = max_depth;
    }
    let request = request.with_workers(args.workers).with_depths(args.depths);

    let result = certify_with(&request).unwrap_or_else(|err| exit_on_error(err));
    tracing::info!(
        certificate_id = %result.certificate_id,
        to_depth = result.to_depth,
        "certification complete"
    );

    if args.json {
        print_json_or_exit(&result, "certify");
        return;
    }

    println!(
        "lml certify --alphabet-size {} --bound {} --max-depth {}",
        result.alphabet_size, result.bound, result.to_depth
    );
    if args.alphabet_size.is_none() {
        let unrestricted: Vec<&str> = config.alphabet.unrestricted().collect();
        println!(
            "  Operations: {} (bounded), {}",
            config.alphabet.distinguished(),
            unrestricted.join(", ")
        );
    }
    println!("  Method: closed-form counting (no path enumerated or executed)");
    println!("  Depths: {}..={}", result.from_depth, result.to_depth);
    println!("  Total paths: {}", group_thousands(&result.total_paths));
    println!("  Admissible: {}", group_thousands(&result.cumulative_admissible));
    println!("  Blocked: {}", group_thousands(&result.cumulative_blocked));
    println!("  Leaked: {}", result.leaked);
    println!("  Leak derivation: {}", result.leaked_derivation.statement());
    println!("  Certificate: {}", result.certificate_id);
    if let Some(depths) = &result.depths {
        println!("  Per depth:");
        for d in depths {
            println!(
                "    - L={} admissible={} blocked={}",
                d.depth,
                group_thousands(&d.admissible),
                group_thousands(&d.blocked)
            );
        }
    }
}
