//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// aptbook - Your appointments at a glance
#[derive(Debug, Parser)]
#[command(name = "aptbook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "APTBOOK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Base URL of the storage service (overrides the config file)
    #[arg(long, env = "APTBOOK_SERVICE_URL", global = true)]
    pub service_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show today's schedule and the week ahead (the default)
    Dashboard,

    /// Show a month as a calendar grid
    Calendar {
        /// Year to show (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Month to show, 1-12 (defaults to the current month)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },

    /// List appointments, optionally filtered
    List {
        /// Case-insensitive search over title and description
        #[arg(long, short)]
        search: Option<String>,
    },

    /// Create an appointment
    Add {
        /// Appointment title
        title: String,

        /// Free-form description
        #[arg(long, short, default_value = "")]
        description: String,

        /// Start date, YYYY-MM-DD
        #[arg(long)]
        date: String,

        /// Start time, HH:MM (24-hour)
        #[arg(long)]
        time: String,

        /// Duration in minutes
        #[arg(long, default_value = "60")]
        duration: u32,

        /// Remind this many minutes before the start; omit for no alarm
        #[arg(long)]
        alarm_offset: Option<u32>,
    },

    /// Edit an existing appointment
    Edit {
        /// Appointment id
        id: u64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long, short)]
        description: Option<String>,

        /// New start date, YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,

        /// New start time, HH:MM (24-hour)
        #[arg(long)]
        time: Option<String>,

        /// New duration in minutes
        #[arg(long)]
        duration: Option<u32>,

        /// New alarm offset in minutes before the start
        #[arg(long, conflicts_with = "no_alarm")]
        alarm_offset: Option<u32>,

        /// Disable the alarm
        #[arg(long)]
        no_alarm: bool,
    },

    /// Delete an appointment
    Remove {
        /// Appointment id
        id: u64,
    },

    /// Run the reminder loop until Ctrl-C
    Watch {
        /// Seconds between alarm evaluation ticks
        #[arg(long)]
        interval_secs: Option<u64>,
    },
}
