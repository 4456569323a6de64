use clap::{Arg, ArgAction, Command, arg, value_parser};

pub const DUX4R_CMD: &str = "dux4r";
pub const DEFAULT_JSON: &str = "rearrscan_results.json";
pub const DEFAULT_THREADS: &str = "1";
pub const DEFAULT_SRPB_THRESHOLD: &str = "20.0";
pub const DEFAULT_MINIMUM_MAPQ: &str = "10";

pub fn create_dux4r_cli() -> Command {
    Command::new(DUX4R_CMD)
        .about("Find DUX4 rearrangements in an indexed BAM file aligned to GRCh38.")
        .arg_required_else_help(true)
        .arg(Arg::new("infile").required(true).help("Indexed BAM file (the .bai must sit next to it)"))
        .arg(
            arg!(--json <FILE> "JSON file the results are written to")
                .required(false)
                .default_value(DEFAULT_JSON),
        )
        .arg(arg!(--export <DIR> "Directory receiving one SAM file of supporting reads per rearrangement").required(false))
        .arg(
            Arg::new("total-number-reads")
                .long("total-number-reads")
                .value_name("INT")
                .value_parser(value_parser!(u64))
                .help("Number of unique mapped reads, skips counting them"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .value_name("INT")
                .value_parser(value_parser!(usize))
                .default_value(DEFAULT_THREADS)
                .help("Number of threads decompressing the BAM file while counting the total number of reads"),
        )
        .arg(
            Arg::new("srpb-threshold")
                .long("srpb-threshold")
                .value_name("FLOAT")
                .value_parser(value_parser!(f64))
                .default_value(DEFAULT_SRPB_THRESHOLD)
                .help("Minimum SRPB of a rearrangement with a partner other than IGH"),
        )
        .arg(
            Arg::new("only-igh-dux4")
                .long("only-igh-dux4")
                .action(ArgAction::SetTrue)
                .help("Only look for IGH-DUX4 rearrangements"),
        )
        .arg(
            Arg::new("minimum-mapq")
                .long("minimum-mapq")
                .value_name("INT")
                .value_parser(value_parser!(u8))
                .default_value(DEFAULT_MINIMUM_MAPQ)
                .help("Minimum mapping quality of reads used to discover candidate regions"),
        )
        .arg(
            Arg::new("filter-regions")
                .long("filter-regions")
                .value_name("FILE")
                .help("BED file (plain or gzipped) of regions never reported as candidates"),
        )
}
