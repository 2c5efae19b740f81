use std::env;

#[derive(Debug, Default)]
pub struct ServerArgs {
    pub port: Option<u16>,
}

pub fn parse_args() -> Result<ServerArgs, String> {
    let mut args = env::args().skip(1);
    let mut parsed = ServerArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--port" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --port".to_string())?;
                let port = value
                    .parse::<u16>()
                    .map_err(|_| format!("invalid port value: {value}"))?;
                parsed.port = Some(port);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument: {arg}"));
            }
        }
    }

    Ok(parsed)
}

pub fn print_help() {
    println!(
        "SubTrack server\n\n\
Usage:\n  subtrack-server [--port <port>]\n\n\
Options:\n  --port <port>  Override the configured port for this run only\n  -h, --help     Show this help message\n\n\
Environment:\n  CRON_SECRET      Shared secret required by /cron routes (generated if unset)\n  RESEND_API_KEY   Enables outbound reminder email\n  SUBTRACK_DATA_DIR  Override the data directory\n"
    );
}
