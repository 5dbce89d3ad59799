use crate::CLAP_STYLING;
use clap::{arg, command};
use skimmer_core::config::DEFAULT_STORE_PATH;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("skimmer")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("skimmer")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose" "Enable debug logging on stderr")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Initializes the skimmer page cache on your filesystem")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Location of the cache database")
                        .default_value(DEFAULT_STORE_PATH),
                )
                .arg(
                    arg!(-f --"force")
                        .help("Deletes any existing cache database at the specified location.")
                        .required(false),
                ),
        )
        .subcommand(
            command!("blog")
                .about("Extract the articles and links of a page, serving it from the cache when possible")
                .arg(
                    arg!(<TARGET>)
                        .required(true)
                        .help("The page to read, e.g. https://example.com/blog or example.com/blog"),
                )
                .arg(
                    arg!(--"refresh")
                        .required(false)
                        .help("Ignore any cached copy, fetch the page and overwrite the cache")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"store" <PATH>)
                        .required(false)
                        .help("Location of the cache database")
                        .default_value(DEFAULT_STORE_PATH)
                        .conflicts_with("no-store"),
                )
                .arg(
                    arg!(--"no-store")
                        .required(false)
                        .help("Keep the cache in memory for this run only")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(timeout_arg())
                .arg(format_arg())
                .arg(output_arg()),
        )
        .subcommand(
            command!("discover")
                .about("Compute link, tag and word statistics for a page")
                .arg(
                    arg!(<TARGET>)
                        .required(true)
                        .help("The page to analyze, e.g. https://example.com/"),
                )
                .arg(timeout_arg())
                .arg(format_arg())
                .arg(output_arg()),
        )
        .subcommand(command!("info").about("Describe the read operations skimmer offers"))
}

fn timeout_arg() -> clap::Arg {
    arg!(--"timeout" <SECONDS>)
        .required(false)
        .help("Request timeout in seconds")
        .value_parser(clap::value_parser!(u64).range(1..))
        .default_value("10")
}

fn format_arg() -> clap::Arg {
    arg!(-f --"format" <FORMAT>)
        .required(false)
        .help("Output format: json, text")
        .value_parser(["json", "text"])
        .default_value("json")
}

fn output_arg() -> clap::Arg {
    arg!(-o --"output" <PATH>)
        .required(false)
        .help("Save output to file (default: print to screen)")
        .value_parser(clap::value_parser!(std::path::PathBuf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_must_be_positive() {
        let result = command_argument_builder().try_get_matches_from([
            "skimmer",
            "blog",
            "example.com",
            "--timeout",
            "0",
        ]);
        assert!(result.is_err());

        let matches = command_argument_builder()
            .try_get_matches_from(["skimmer", "discover", "example.com", "--timeout", "5"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_one::<u64>("timeout"), Some(&5));
    }

    #[test]
    fn test_store_defaults_to_config_path() {
        let matches = command_argument_builder()
            .try_get_matches_from(["skimmer", "blog", "example.com"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(
            sub.get_one::<String>("store").map(String::as_str),
            Some(DEFAULT_STORE_PATH)
        );
    }
}
