//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "hl7diff.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing hl7diff configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Point [input.output] and [input.example] at your transcripts");
                println!("  2. Adjust [compare.ignore] for fields that legitimately differ");
                println!("  3. Validate configuration: hl7diff validate-config");
                println!("  4. Run comparison: hl7diff compare");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# hl7diff Configuration File
# HL7 v2 transcript comparison

[application]
log_level = "info"

[input.output]
path = "output.csv"
format = "csv"

[input.example]
path = "example.csv"
format = "csv"

[compare]
segments = ["MSH", "EVN", "PID", "PD1", "NK1", "PV1", "PV2", "ORC", "OBR", "OBX", "NTE", "AL1", "DG1", "IN1"]
resegment = true
extra_segments = "ignore"
missing_fields = "ignore"
parallel_pairs = 8

[compare.correlation]
segment = "PID"
field = 3

[compare.ignore]
MSH = [7, 10]
EVN = [2, 6]
OBR = [7, 22]
OBX = [14, 19]

[report]
format = "text"
fail_on_mismatch = true

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# hl7diff Configuration File
# HL7 v2 transcript comparison
#
# Compares an output transcript (what a system produced) against an example
# transcript (what it should have produced), pairing messages by patient
# identifier and reporting every field that differs.
#
# Values of the form ${VAR} are replaced from the environment when the file
# is loaded.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Input Transcripts
# ============================================================================
# Transcript formats:
#   - lines: one message per line, segments separated by carriage returns
#   - csv:   one message per row in the first column (quoted as needed)
#   - json:  a JSON array of message strings
[input.output]
path = "${HL7DIFF_OUTPUT_PATH}"
format = "csv"

[input.example]
path = "${HL7DIFF_EXAMPLE_PATH}"
format = "csv"

# ============================================================================
# Comparison Settings
# ============================================================================
[compare]
# Segments taking part in the comparison, in report order
segments = [
    "MSH", "EVN", "PID", "PD1", "NK1", "PV1", "PV2",
    "ORC", "OBR", "OBX", "NTE", "AL1", "DG1", "IN1",
]

# Restore segment boundaries in messages whose separators were flattened
resegment = true

# Segment names that start a new segment when re-segmenting. Defaults to the
# standard HL7 v2 segment table plus any Z segment; compared segments are
# always included.
# anchors = ["MSH", "EVN", "PID", "PV1", "ZPD"]

# Segment occurrences present on one side only: "ignore" or "report"
extra_segments = "ignore"

# Fields present on one side only: "ignore" or "report"
missing_fields = "ignore"

# Correlated pairs diffed concurrently (1-64)
parallel_pairs = 8

# Where the correlation key lives (PID-3 by default)
[compare.correlation]
segment = "PID"
field = 3

# Field indices never compared, per segment. Timestamps, control IDs and
# other values expected to differ between runs belong here.
[compare.ignore]
MSH = [7, 10]   # date/time of message, message control ID
EVN = [2, 6]    # recorded date/time, event occurred
OBR = [7, 22]   # observation date/time, results reported date/time
OBX = [14, 19]  # observation date/time, analysis date/time

# ============================================================================
# Report Settings
# ============================================================================
[report]
# Report format: "text" or "json"
format = "text"

# Write the report to a file instead of stdout
# output_path = "hl7diff-report.txt"

# Exit with code 1 when mismatches are found
fail_on_mismatch = true

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging in addition to the console
local_enabled = false

# Directory for log files
local_path = "./logs"

# Log rotation: daily, hourly or never
local_rotation = "daily"
"#
        .to_string()
    }
}
