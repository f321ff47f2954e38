use clap::Parser;
use clap::error::ErrorKind;

use crate::context::HandlerContext;
use crate::error::{ExtractError, ExtractResult};
use crate::extractor::FromContext;

/// Command arguments parsed with clap.
///
/// The command name is used as the binary name, so usage text reads like
/// the user typed it. `--help` and parse errors become
/// [`ExtractError::Help`] / [`ExtractError::Usage`]; the command service
/// prints them through the logger and reports the command as handled.
///
/// ```rust,ignore
/// #[derive(Parser, Clone)]
/// struct ExampleArgs {
///     target: String,
/// }
///
/// fn example(args: Parsed<ExampleArgs>, logger: Logger) -> bool {
///     logger.log(&args.target);
///     true
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Parsed<T: Parser>(pub T);

impl<T: Parser> Parsed<T> {
    /// Unwraps the parsed value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Parser> std::ops::Deref for Parsed<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: Parser> FromContext for Parsed<T> {
    fn from_context(ctx: &HandlerContext) -> ExtractResult<Self> {
        let (Some(name), Some(args)) = (ctx.command(), ctx.args()) else {
            return Err(ExtractError::NotACommand);
        };
        let argv = std::iter::once(name).chain(args.iter().map(String::as_str));

        T::try_parse_from(argv).map(Parsed).map_err(|e| match e.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                ExtractError::Help(e.to_string())
            }
            _ => ExtractError::Usage(e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::test_support::command_ctx;

    #[derive(Parser, Debug, Clone, PartialEq)]
    struct ExampleArgs {
        target: String,
        #[arg(long)]
        force: bool,
    }

    #[test]
    fn test_parsed_uses_command_tokens() {
        let ctx = command_ctx("example", &["app", "--force"]);
        let parsed = Parsed::<ExampleArgs>::from_context(&ctx).unwrap();
        assert_eq!(parsed.target, "app");
        assert!(parsed.force);
    }

    #[test]
    fn test_parsed_reports_usage_and_help() {
        let missing = command_ctx("example", &[]);
        assert!(matches!(
            Parsed::<ExampleArgs>::from_context(&missing),
            Err(ExtractError::Usage(_))
        ));

        let help = command_ctx("example", &["--help"]);
        match Parsed::<ExampleArgs>::from_context(&help) {
            Err(ExtractError::Help(text)) => assert!(text.contains("example")),
            other => panic!("expected help, got {other:?}"),
        }
    }
}
