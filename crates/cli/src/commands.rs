use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Extract every record closed on the run date and write one object per page
    Run {
        #[arg(long, help = "Run date (YYYY-MM-DD); defaults to seven days ago")]
        run_date: Option<String>,

        #[arg(long, help = "Records per page; overrides LOADER_BATCH_SIZE")]
        batch_size: Option<usize>,

        #[arg(
            long,
            help = "If specified, writes the JSON run report to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Handle a trigger event the way the scheduled job does
    Invoke {
        #[arg(
            long,
            default_value = "{}",
            help = "Event JSON, or @path to read it from a file"
        )]
        event: String,
    },
    /// Print the request URL for one page without sending it
    Query {
        #[arg(long, help = "Run date (YYYY-MM-DD); defaults to seven days ago")]
        run_date: Option<String>,

        #[arg(long, default_value_t = 0)]
        offset: usize,

        #[arg(long, help = "Records per page; defaults to LOADER_BATCH_SIZE")]
        limit: Option<usize>,
    },
}
