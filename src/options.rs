// SPDX-License-Identifier: MIT
//
// Drawing options and command-line parsing.
//
// Options use the `set` syntax: `name` turns a boolean on, `noname` turns
// it off, `name=value` assigns. They can be given in any order with the
// preset path and `--print`:
//
//   linecanvas style=heavy nostatus diagrams/frame.txt
//
// | Name      | Abbrev | Type  | Default  |
// |-----------|--------|-------|----------|
// | `style`   | `st`   | style | `single` |
// | `preview` | `pv`   | bool  | on       |
// | `status`  | `ls`   | bool  | on       |

use std::path::PathBuf;

use lc_canvas::LineStyle;
use thiserror::Error;

pub const USAGE: &str = "\
usage: linecanvas [--print] [OPTION...] [PRESET]

options:
  style=<single|double|heavy|dashed>   pen style (default single)
  preview / nopreview                  show the stroke while dragging
  status / nostatus                    show the status line
  --print                              print PRESET to stdout and exit
  -h, --help                           show this help";

// ─── Directives ─────────────────────────────────────────────────────────────

/// One parsed `set` word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `name`
    On(String),
    /// `noname`
    Off(String),
    /// `name=value`
    Assign(String, String),
}

#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    matches!(name, "preview" | "pv" | "status" | "ls")
}

#[must_use]
pub fn is_known_option(name: &str) -> bool {
    is_bool_option(name) || matches!(name, "style" | "st")
}

/// Parse one word. `nopreview` is `Off("preview")`, but a name that only
/// happens to start with `no` stays whole.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_owned(), value.to_owned());
    }
    match arg.strip_prefix("no") {
        Some(name) if is_bool_option(name) => SetDirective::Off(name.to_owned()),
        _ => SetDirective::On(arg.to_owned()),
    }
}

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unknown option `{0}`")]
    Unknown(String),
    #[error("option `{0}` needs a value")]
    MissingValue(String),
    #[error("option `{0}` takes no value")]
    UnexpectedValue(String),
    #[error("invalid {name} `{value}`")]
    InvalidValue { name: String, value: String },
    #[error("more than one preset given (`{0}`)")]
    ExtraPreset(String),
}

// ─── DrawOptions ────────────────────────────────────────────────────────────

/// Settings for an interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawOptions {
    pub style: LineStyle,
    pub preview: bool,
    pub status: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            style: LineStyle::Single,
            preview: true,
            status: true,
        }
    }
}

impl DrawOptions {
    /// Apply one directive.
    ///
    /// # Errors
    ///
    /// Unknown names, a bare `style`, a value given to a boolean, or an
    /// unrecognized style name.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<(), OptionError> {
        match directive {
            SetDirective::On(name) | SetDirective::Off(name) if !is_known_option(name) => {
                Err(OptionError::Unknown(name.clone()))
            }
            SetDirective::On(name) | SetDirective::Off(name) if !is_bool_option(name) => {
                Err(OptionError::MissingValue(name.clone()))
            }
            SetDirective::On(name) => {
                self.set_flag(name, true);
                Ok(())
            }
            SetDirective::Off(name) => {
                self.set_flag(name, false);
                Ok(())
            }
            SetDirective::Assign(name, value) => match name.as_str() {
                "style" | "st" => {
                    // `none` would draw invisible strokes.
                    self.style = LineStyle::from_name(value)
                        .filter(|s| s.is_visible())
                        .ok_or_else(|| OptionError::InvalidValue {
                            name: "style".into(),
                            value: value.clone(),
                        })?;
                    Ok(())
                }
                n if is_bool_option(n) => Err(OptionError::UnexpectedValue(name.clone())),
                _ => Err(OptionError::Unknown(name.clone())),
            },
        }
    }

    fn set_flag(&mut self, name: &str, on: bool) {
        match name {
            "preview" | "pv" => self.preview = on,
            "status" | "ls" => self.status = on,
            _ => {}
        }
    }
}

// ─── Command line ───────────────────────────────────────────────────────────

/// What the command line asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cli {
    pub options: DrawOptions,
    pub preset: Option<PathBuf>,
    pub print: bool,
    pub help: bool,
}

/// Parse the arguments after the program name.
///
/// Known option names and anything containing `=` are options; `--print`
/// and `-h`/`--help` are flags; the single remaining word is the preset.
///
/// # Errors
///
/// The first bad option, or a second preset path.
pub fn parse_args<I, S>(args: I) -> Result<Cli, OptionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cli = Cli::default();
    for arg in args {
        let arg = arg.as_ref();
        match arg {
            "--print" | "-p" => cli.print = true,
            "--help" | "-h" => cli.help = true,
            _ if arg.contains('=') || is_set_word(arg) => {
                cli.options.apply(&parse_set_arg(arg))?;
            }
            _ if arg.starts_with('-') => return Err(OptionError::Unknown(arg.to_owned())),
            _ if cli.preset.is_some() => return Err(OptionError::ExtraPreset(arg.to_owned())),
            _ => cli.preset = Some(PathBuf::from(arg)),
        }
    }
    Ok(cli)
}

fn is_set_word(arg: &str) -> bool {
    is_known_option(arg) || arg.strip_prefix("no").is_some_and(is_bool_option)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── parse_set_arg ─────────────────────────────────────────────────

    #[test]
    fn set_words() {
        assert_eq!(parse_set_arg("preview"), SetDirective::On("preview".into()));
        assert_eq!(parse_set_arg("nostatus"), SetDirective::Off("status".into()));
        assert_eq!(parse_set_arg("nols"), SetDirective::Off("ls".into()));
        assert_eq!(
            parse_set_arg("style=heavy"),
            SetDirective::Assign("style".into(), "heavy".into())
        );
    }

    #[test]
    fn no_prefix_only_for_bool_options() {
        assert_eq!(parse_set_arg("nothing"), SetDirective::On("nothing".into()));
        assert_eq!(parse_set_arg("nostyle"), SetDirective::On("nostyle".into()));
    }

    // ── DrawOptions::apply ────────────────────────────────────────────

    #[test]
    fn apply_flags_and_style() {
        let mut o = DrawOptions::default();
        o.apply(&parse_set_arg("nopreview")).unwrap();
        o.apply(&parse_set_arg("st=double")).unwrap();
        assert_eq!(
            o,
            DrawOptions {
                style: LineStyle::Double,
                preview: false,
                status: true,
            }
        );
        o.apply(&parse_set_arg("pv")).unwrap();
        assert!(o.preview);
    }

    #[test]
    fn apply_rejects_bad_input() {
        let mut o = DrawOptions::default();
        assert_eq!(
            o.apply(&parse_set_arg("wrap")),
            Err(OptionError::Unknown("wrap".into()))
        );
        assert_eq!(
            o.apply(&parse_set_arg("style")),
            Err(OptionError::MissingValue("style".into()))
        );
        assert_eq!(
            o.apply(&parse_set_arg("status=1")),
            Err(OptionError::UnexpectedValue("status".into()))
        );
        assert_eq!(
            o.apply(&parse_set_arg("style=wavy")),
            Err(OptionError::InvalidValue {
                name: "style".into(),
                value: "wavy".into()
            })
        );
        assert!(o.apply(&parse_set_arg("style=none")).is_err());
        assert_eq!(o, DrawOptions::default());
    }

    // ── parse_args ────────────────────────────────────────────────────

    #[test]
    fn args_mix_options_flags_and_preset() {
        let cli = parse_args(["style=heavy", "frame.txt", "nostatus", "--print"]).unwrap();
        assert_eq!(cli.options.style, LineStyle::Heavy);
        assert!(!cli.options.status);
        assert!(cli.print);
        assert_eq!(cli.preset, Some(PathBuf::from("frame.txt")));
    }

    #[test]
    fn no_args_is_default() {
        assert_eq!(parse_args(Vec::<String>::new()).unwrap(), Cli::default());
    }

    #[test]
    fn args_errors() {
        assert_eq!(
            parse_args(["a.txt", "b.txt"]),
            Err(OptionError::ExtraPreset("b.txt".into()))
        );
        assert_eq!(
            parse_args(["--verbose"]),
            Err(OptionError::Unknown("--verbose".into()))
        );
        assert!(parse_args(["style=zigzag"]).is_err());
    }

    #[test]
    fn help_flag() {
        assert!(parse_args(["-h"]).unwrap().help);
        assert!(USAGE.contains("--print"));
    }
}
