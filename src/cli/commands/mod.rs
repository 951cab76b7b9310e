use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("sesamo")
        .about("GraphQL session gateway for email/password authentication")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("SESAMO_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("backend-url")
                .short('b')
                .long("backend-url")
                .help("Auth backend base URL, example: https://auth.tld:4000")
                .env("SESAMO_BACKEND_URL")
                .required(true),
        )
        .arg(
            Arg::new("graphiql")
                .long("graphiql")
                .help("Serve the GraphiQL explorer on GET /graphql")
                .env("SESAMO_GRAPHIQL")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("cors-origin")
                .long("cors-origin")
                .help("Allowed CORS origin, may be repeated (default: any origin, no credentials)")
                .env("SESAMO_CORS_ORIGIN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("SESAMO_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
