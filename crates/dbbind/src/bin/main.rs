//! dbbind command-line interface

use clap::{Parser, Subcommand};
use dbbind::cli::{bind, field, output};
use std::path::PathBuf;

/// dbbind command-line tool
#[derive(Parser)]
#[command(name = "dbbind")]
#[command(author, version, about = "Bind parameters against a table schema", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bind a JSON object or filter description and print the parameters
    Bind {
        /// Schema file (JSON object of table name to columns)
        #[arg(short, long)]
        schema: PathBuf,

        /// Table to bind against; optional when the schema has one table
        #[arg(short, long)]
        table: Option<String>,

        /// Source file (JSON)
        #[arg(long)]
        source: PathBuf,

        /// Read the source as a filter description
        #[arg(long)]
        filter: bool,

        /// Convert every value to its column's type
        #[arg(long)]
        automatic: bool,

        /// Binder options file (JSON)
        #[arg(long)]
        options: Option<PathBuf>,

        /// Members to leave unbound
        #[arg(long = "skip")]
        skip: Vec<String>,

        /// Output format (json, pretty, table)
        #[arg(short = 'f', long, default_value = "pretty")]
        format: String,
    },

    /// Show the schema column a parameter name resolves to
    Field {
        /// Parameter or column name
        name: String,

        /// Schema file (JSON object of table name to columns)
        #[arg(short, long)]
        schema: PathBuf,

        /// Table to search; optional when the schema has one table
        #[arg(short, long)]
        table: Option<String>,
    },
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(&cli.color);

    let result = match cli.command {
        Commands::Bind {
            schema,
            table,
            source,
            filter,
            automatic,
            options,
            skip,
            format,
        } => {
            let config = bind::BindConfig {
                schema,
                table,
                source,
                filter,
                automatic,
                options,
                skip,
                verbose: cli.verbose,
                output_format: Some(format),
                output_file: cli.output.clone(),
            };
            bind::bind(config)
        }

        Commands::Field {
            name,
            schema,
            table,
        } => {
            let config = field::FieldConfig {
                name,
                schema,
                table,
                output_file: cli.output.clone(),
            };
            field::field(config)
        }
    };

    if let Err(e) = result {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}
