use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lml",
    about = "LML: closed-form path-space certification and a lexical admissibility gate",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Certify every path of length 1..=max-depth by closed-form counting
    Certify {
        /// Alphabet size (defaults to the configured alphabet)
        #[arg(long, allow_negative_numbers = true)]
        alphabet_size: Option<i64>,

        /// Maximum occurrences of the distinguished operation per path
        #[arg(long, allow_negative_numbers = true)]
        bound: Option<i64>,

        /// Longest path length to certify
        #[arg(long, allow_negative_numbers = true)]
        max_depth: Option<i64>,

        /// Worker threads the depth range is split across
        #[arg(long, default_value_t = 1)]
        workers: usize,

        /// Include per-depth counts
        #[arg(long)]
        depths: bool,

        /// Path to an lml.toml configuration file
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recompute a JSON certificate and compare every claim
    Verify {
        /// Path to the certificate JSON
        certificate: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify text against the grounding rule set
    Gate {
        /// Text to classify (reads --file or stdin when omitted)
        text: Option<String>,

        /// Read text from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<String>,

        /// Indicator phrase; repeat to build the rule set in order
        #[arg(long = "indicator")]
        indicators: Vec<String>,

        /// Law identifier for indicators given on the command line
        #[arg(long)]
        law_id: Option<String>,

        /// Path to an lml.toml configuration file
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run generator programs on a prompt and gate each output
    Enforce {
        /// Prompt passed to each generator on stdin
        #[arg(long)]
        prompt: String,

        /// Generator command line (program and arguments, whitespace separated); repeatable
        #[arg(long = "generator", required = true)]
        generators: Vec<String>,

        /// Path to an lml.toml configuration file
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective grounding rule set and alphabet
    Rules {
        /// Path to an lml.toml configuration file
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
