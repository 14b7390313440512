//! Core comparison logic for hl7diff.
//!
//! # Modules
//!
//! - [`correlation`] - Correlation key resolution and the output/example join
//! - [`diff`] - Field-level diff engine, ignore rules and mismatch reports
//! - [`compare`] - Record construction, run coordination and summaries
//!
//! # Comparison Workflow
//!
//! 1. **Load**: Read both transcripts through their sources
//! 2. **Build**: Re-segment, parse and extract each record, resolving its key
//! 3. **Correlate**: Pair output and example records sharing a key
//! 4. **Diff**: Compare each pair segment by segment
//! 5. **Report**: Summarize counts, dropped records and mismatches
//!
//! # Example
//!
//! ```rust,no_run
//! use hl7diff::config::load_config;
//! use hl7diff::core::compare::ComparisonCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("hl7diff.toml")?;
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let coordinator = ComparisonCoordinator::new(&config, shutdown_rx)?;
//! let summary = coordinator.execute().await?;
//!
//! println!("Pairs compared: {}", summary.pairs_compared);
//! println!("Mismatches: {}", summary.mismatch_count());
//! # Ok(())
//! # }
//! ```

pub mod compare;
pub mod correlation;
pub mod diff;
