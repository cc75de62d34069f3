use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(
        short,
        long,
        default_value = "resolvers.txt",
        help = "File with DNS resolver ips to verify. Default: resolvers.txt"
    )]
    pub resolvers: String,

    #[arg(
        short,
        long,
        default_value_t = 100,
        help = "Number of concurrent workers. Default: 100"
    )]
    pub threads: usize,

    #[arg(
        short,
        long,
        default_value = "verify-resolvers.txt",
        help = "File where verified resolvers are appended. Default: verify-resolvers.txt"
    )]
    pub output: String,

    #[arg(
        long,
        help = "Skip lines that are not valid IPv4/IPv6 addresses instead of querying them."
    )]
    pub validate: bool,

    #[arg(short, long, help = "Quiet mode, only warnings and errors are logged.")]
    pub quiet: bool,
}
