// main.rs - CLI entry point

use std::path::Path;
use std::time::Instant;
use weightedld::cli::Config;
use weightedld::core::pipeline::compute_weights;
use weightedld::data::LoadedInput;
use weightedld::output::{open_output, write_summary_json, write_weights};
use weightedld::prelude::*;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

/// Status lines go to stderr so that stdout can carry the LD stream
struct Status {
    quiet: bool,
}

impl Status {
    fn say(&self, message: impl AsRef<str>) {
        if !self.quiet {
            eprintln!("{}", message.as_ref());
        }
    }
}

fn run_main() -> Result<(), String> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        println!("{}", Config::generate_sample());
        eprintln!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    let status = Status { quiet: args.quiet };
    if let Some(config_path) = &args.config {
        status.say(format!("📄 Loaded configuration from: {}", config_path));
    }

    let input = args.input.clone().ok_or("--input is required")?;
    let validation_result = validate_args(&args)?;

    status.say(format!("🚀 {}", weightedld::get_info()));

    // Configure thread pool
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        status.say(format!("🧵 Threads: {}", n));
    } else {
        status.say(format!(
            "🧵 Threads: {} (auto-detected)",
            rayon::current_num_threads()
        ));
    }

    let total_start = Instant::now();

    // Load input matrix
    let LoadedInput {
        mut matrix,
        format,
        vcf_stats,
    } = load_matrix(Path::new(&input), validation_result.input_format)?;

    status.say(format!(
        "✅ {} loaded: {} samples × {} sites ({})",
        format.name(),
        matrix.n_samples(),
        matrix.n_sites(),
        input
    ));
    if let Some(stats) = &vcf_stats {
        status.say(format!(
            "   📊 {} records, {} biallelic SNVs kept, {} multi-allelic and {} non-SNV skipped",
            stats.records, stats.kept, stats.skipped_multiallelic, stats.skipped_non_snv
        ));
        status.say(format!("   ❓ {} missing allele calls", stats.missing_calls));
        status.say(format!(
            "   🧬 {} samples expanded to {} haplotypes",
            stats.samples, stats.haplotypes
        ));
    }

    let removed = matrix.filter_samples(
        validation_result.sample_include_regex.as_ref(),
        validation_result.sample_exclude_regex.as_ref(),
    )?;
    if removed > 0 {
        status.say(format!(
            "🔍 Sample filters: kept {} samples (removed {})",
            matrix.n_samples(),
            removed
        ));
    }

    let thresholds = validation_result.thresholds;
    status.say(format!(
        "🎯 Thresholds: min_acgt > {}, variability > {} (weighting), > {} (LD)",
        thresholds.min_acgt, thresholds.min_variability_hk, thresholds.min_variability_ld
    ));

    if args.dry_run {
        let eligibility = detect_variable_sites(&matrix, &thresholds);
        let ld_sites = eligibility.ld_count();
        status.say(format!(
            "📊 Eligible sites: {} for weighting, {} for LD ({} pairs)",
            eligibility.hk_count(),
            ld_sites,
            weightedld::core::ld::pair_count(ld_sites)
        ));
        if let Some(path) = &args.weights_output {
            let weights = compute_weights(&matrix, &eligibility, !args.no_weighting);
            write_weights(
                path,
                matrix.sample_ids(),
                &weights,
                validation_result.output_format,
                args.precision,
            )?;
            status.say(format!("✅ Weights written to: {}", path));
        }
        status.say("✅ Dry run completed successfully");
        return Ok(());
    }

    if args.no_weighting {
        status.say("⚖️  Weighting: disabled (flat weights)");
    } else {
        status.say("⚖️  Weighting: Henikoff position-based");
    }

    let writer = open_output(&args.output)?;
    let mut sink = DelimitedLdWriter::new(writer, validation_result.output_format, args.precision)?;

    let config = PipelineConfig {
        thresholds,
        weighting: !args.no_weighting,
        show_progress: !args.quiet,
    };
    let result = run_pipeline(&matrix, &config, &mut sink)?;
    let summary = &result.summary;

    status.say(format!(
        "📊 Eligible sites: {} for weighting, {} for LD",
        summary.hk_sites, summary.ld_sites
    ));
    status.say(format!(
        "⚖️  Weights: min {:.4}, max {:.4}, mean {:.4}",
        summary.weight_min, summary.weight_max, summary.weight_mean
    ));
    if args.output == "-" {
        status.say(format!("✅ {} pairs written to stdout", summary.pairs));
    } else {
        status.say(format!("✅ {} pairs written to: {}", summary.pairs, args.output));
    }

    if let Some(path) = &args.weights_output {
        write_weights(
            path,
            matrix.sample_ids(),
            &result.weights,
            validation_result.output_format,
            args.precision,
        )?;
        status.say(format!("✅ Weights written to: {}", path));
    }

    if let Some(path) = &args.summary_json {
        write_summary_json(path, summary, &input, &command_line)?;
        status.say(format!("💾 Summary saved to: {}", path));
    }

    status.say(format!(
        "⏱️  Total time: {:.2}s",
        total_start.elapsed().as_secs_f64()
    ));
    Ok(())
}
