//! Chart directives per `--next` group, parsed with clap.
//!
//! Each group is matched against a small `clap::Command` of its own. The
//! directives are then put back into command-line order using the argv
//! positions clap records for every occurrence (`ArgMatches::indices_of`),
//! since `-d` and `-r` apply to whichever `-f` follows them.

use crate::directive::Directive;
use crate::error::{PlotError, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::path::PathBuf;

const NEXT_SHORT: &str = "-n";
const NEXT_LONG: &str = "--next";

/// Split argv on `-n/--next`. Runs of separators never produce empty groups.
pub fn split_groups(args: &[String]) -> Vec<&[String]> {
    args.split(|a| a == NEXT_SHORT || a == NEXT_LONG)
        .filter(|group| !group.is_empty())
        .collect()
}

/// Option that may repeat; every occurrence carries one value.
fn repeated(id: &'static str, value_name: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .value_name(value_name)
        .num_args(1)
        .action(ArgAction::Append)
}

/// Flag that may repeat. Each occurrence stores a value so that its
/// position shows up in `indices_of`.
fn marker(id: &'static str, short: char) -> Arg {
    Arg::new(id)
        .short(short)
        .long(id)
        .num_args(0)
        .default_missing_value("true")
        .value_parser(value_parser!(bool))
        .action(ArgAction::Append)
}

fn group_command() -> Command {
    Command::new("chart")
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            repeated("cycle_length", "N")
                .short('c')
                .alias("cycle-length")
                .value_parser(value_parser!(usize)),
        )
        .arg(repeated("field", "NAME").short('f'))
        .arg(marker("right", 'r'))
        .arg(marker("drop", 'd'))
        .arg(repeated("offset", "N").short('o').value_parser(value_parser!(usize)))
        .arg(repeated("frames", "N").value_parser(value_parser!(usize)))
        .arg(repeated("title", "TEXT").short('t'))
        .arg(
            repeated("output_filename", "PATH")
                .short('O')
                .alias("output-filename")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("files")
                .value_name("FILE")
                .num_args(1..)
                .action(ArgAction::Append),
        )
}

/// Collect `(argv position, directive)` pairs for one argument.
fn collect<T>(
    matches: &ArgMatches,
    id: &str,
    out: &mut Vec<(usize, Directive)>,
    make: impl Fn(&T) -> Directive,
) where
    T: Clone + Send + Sync + 'static,
{
    if let (Some(indices), Some(values)) = (matches.indices_of(id), matches.get_many::<T>(id)) {
        out.extend(indices.zip(values.map(make)));
    }
}

fn config_error(graph: usize, err: clap::Error) -> PlotError {
    let text = err.to_string();
    let first = text.lines().next().unwrap_or_default();
    PlotError::config(graph, first.trim_start_matches("error: ").trim())
}

/// Parse one chart group into directives, in command-line order.
/// `graph` is only used for error messages.
pub fn lex_group(graph: usize, args: &[String]) -> Result<Vec<Directive>> {
    let matches = group_command()
        .try_get_matches_from(args.iter().map(String::as_str))
        .map_err(|err| config_error(graph, err))?;

    let mut indexed = Vec::new();
    collect(&matches, "cycle_length", &mut indexed, |n: &usize| Directive::CycleLength(*n));
    collect(&matches, "field", &mut indexed, |s: &String| Directive::Field(s.clone()));
    collect(&matches, "right", &mut indexed, |_: &bool| Directive::Right);
    collect(&matches, "drop", &mut indexed, |_: &bool| Directive::Drop);
    collect(&matches, "offset", &mut indexed, |n: &usize| Directive::Offset(*n));
    collect(&matches, "frames", &mut indexed, |n: &usize| Directive::Frames(*n));
    collect(&matches, "title", &mut indexed, |s: &String| Directive::Title(s.clone()));
    collect(&matches, "output_filename", &mut indexed, |p: &PathBuf| {
        Directive::Output(p.clone())
    });
    collect(&matches, "files", &mut indexed, |s: &String| Directive::File(s.clone()));

    indexed.sort_by_key(|(idx, _)| *idx);
    Ok(indexed.into_iter().map(|(_, directive)| directive).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    fn lex(line: &str) -> Result<Vec<Directive>> {
        lex_group(0, &args(line))
    }

    #[test]
    fn splits_on_next() {
        let argv = args("-n -f psnr a.txt -n --next -f ssim b.txt --next");
        let groups = split_groups(&argv);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], &args("-f psnr a.txt")[..]);
        assert_eq!(groups[1], &args("-f ssim b.txt")[..]);
    }

    #[test]
    fn long_and_short_options() {
        let got = lex("-c 200 --field psnr --frames=50 -o 10 -t Slides -O out.html a.txt b.txt")
            .unwrap();
        assert_eq!(
            got,
            vec![
                Directive::CycleLength(200),
                Directive::Field("psnr".into()),
                Directive::Frames(50),
                Directive::Offset(10),
                Directive::Title("Slides".into()),
                Directive::Output(PathBuf::from("out.html")),
                Directive::File("a.txt".into()),
                Directive::File("b.txt".into()),
            ]
        );
    }

    #[test]
    fn flags_keep_their_place_before_fields() {
        let got = lex("-d -f psnr -r -f ssim -f end_to_end").unwrap();
        assert_eq!(
            got,
            vec![
                Directive::Drop,
                Directive::Field("psnr".into()),
                Directive::Right,
                Directive::Field("ssim".into()),
                Directive::Field("end_to_end".into()),
            ]
        );
    }

    #[test]
    fn clustered_flags_keep_order() {
        let got = lex("-df psnr -drf encoded_frame_size -c200").unwrap();
        assert_eq!(
            got,
            vec![
                Directive::Drop,
                Directive::Field("psnr".into()),
                Directive::Drop,
                Directive::Right,
                Directive::Field("encoded_frame_size".into()),
                Directive::CycleLength(200),
            ]
        );
    }

    #[test]
    fn files_interleave_with_options() {
        let got = lex("a.txt -f psnr b.txt -- -weird.txt -f").unwrap();
        assert_eq!(
            got,
            vec![
                Directive::File("a.txt".into()),
                Directive::Field("psnr".into()),
                Directive::File("b.txt".into()),
                Directive::File("-weird.txt".into()),
                Directive::File("-f".into()),
            ]
        );
    }

    #[test]
    fn bad_values_are_config_errors() {
        for line in [
            "-c x",
            "--offset -3",
            "--frames",
            "-f",
            "--right=yes",
            "-x",
            "--bogus 1",
            "-dn",
        ] {
            let err = lex_group(3, &args(line)).unwrap_err();
            assert!(
                matches!(err, PlotError::Config { graph: 3, .. }),
                "{}: {:?}",
                line,
                err
            );
        }
    }

    #[test]
    fn dash_alone_is_a_file() {
        assert_eq!(lex("-").unwrap(), vec![Directive::File("-".into())]);
    }
}
