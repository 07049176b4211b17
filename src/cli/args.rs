// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// weightedld - Pairwise linkage disequilibrium with Henikoff sequence weighting
pub struct Args {
    /// path to an aligned FASTA file or a VCF file
    #[argh(option)]
    pub input: Option<String>,

    /// input format: fasta, vcf (default: detected from the file extension)
    #[argh(option)]
    pub input_format: Option<String>,

    /// output file for pairwise LD records, - for stdout (default: -)
    #[argh(option, default = "String::from(\"-\")")]
    pub output: String,

    /// output format: tsv, csv (default: tsv)
    #[argh(option, default = "String::from(\"tsv\")")]
    pub format: String,

    /// decimal places for D, D' and r2 (default: 4)
    #[argh(option, default = "4")]
    pub precision: usize,

    /// minimum fraction of A/C/G/T calls for a site to be used, strict (default: 0.8)
    #[argh(option, default = "0.8")]
    pub min_acgt: f64,

    /// minimum minor allele fraction for weighting sites, strict (default: 0.02)
    #[argh(option, default = "0.02")]
    pub min_variability: f64,

    /// minimum minor allele fraction for LD sites, strict (default: same as --min-variability)
    #[argh(option)]
    pub min_variability_ld: Option<f64>,

    /// disable Henikoff weighting and use flat weights of 1.0
    #[argh(switch)]
    pub no_weighting: bool,

    /// write per-sample weights to this file
    #[argh(option)]
    pub weights_output: Option<String>,

    /// write a JSON run summary to this file
    #[argh(option)]
    pub summary_json: Option<String>,

    /// include only samples matching regex pattern
    #[argh(option)]
    pub include_samples: Option<String>,

    /// exclude samples matching regex pattern
    #[argh(option)]
    pub exclude_samples: Option<String>,

    /// number of threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// validate inputs and report eligible sites without computing LD
    #[argh(switch)]
    pub dry_run: bool,

    /// suppress status messages and the progress bar
    #[argh(switch)]
    pub quiet: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
