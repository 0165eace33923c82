use clap::{value_parser, Arg, Command, ValueHint};
use fraglabel_cli::input::Input;
use fraglabel_cli::runner::Runner;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::default()
        .filter_level(log::LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("FRAGLABEL_LOG", "error,fraglabel=info"))
        .init();

    let matches = Command::new("fraglabel")
        .version(clap::crate_version!())
        .about("Per-residue isotope labeling fractions from fragment ion intensities")
        .arg(
            Arg::new("parameters")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Path to configuration parameters (JSON file)")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("tsv_paths")
                .short('i')
                .long("input")
                .num_args(1..)
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help(
                    "Paths to tab-delimited fragment ion tables (Protein Prospector export). \
                     Overrides tables listed in the configuration file.",
                )
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("sequence")
                .short('s')
                .long("sequence")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help(
                    "Peptide sequence flanked by boundary markers, e.g. `*DAEFRHDSGYEVHHQK*`. \
                     Overrides the sequence specified in the configuration file.",
                )
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("output_directory")
                .short('o')
                .long("output_directory")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help(
                    "Path where intensity grids, processed sheets and color scripts will be \
                     written. Overrides the directory specified in the configuration file.",
                )
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .value_parser(value_parser!(u16).range(1..))
                .help("Number of input tables to process in parallel (default = # of CPUs)")
                .value_hint(ValueHint::Other),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    let threads = matches
        .get_one::<u16>("threads")
        .copied()
        .map(usize::from)
        .unwrap_or_else(num_cpus::get);

    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()?;

    let input = Input::from_arguments(matches)?;

    let runner = input.build().map(Runner::new)?;
    runner.run()?;

    Ok(())
}
