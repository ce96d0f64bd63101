//! ncgamma_select: neutral-current photon event selection
//!
//!
//! # Introduction (for the physicist)
//!
//! This program reads the ntuple of a simulated neutrino beam overlay sample
//! and looks for neutral-current (NC) interactions that produce photons, as
//! seen by a liquid argon TPC.
//!
//! Each event is classified twice: once according to the simulation truth
//! (what really happened) and once according to the reconstruction (what the
//! detector software thinks happened). Comparing both tells how efficient and
//! how pure a reconstructed NC photon selection is, and which cuts are
//! responsible for losing signal or letting background in.
//!
//! Results are histograms of an energy-like quantity, weighted by the event's
//! cross-section weight and normalized to a target beam exposure (6.67e20
//! protons on target).
//!
//!
//! # Introduction (for the computer guy)
//!
//! * read in the configuration and the event store
//! * loop over events,
//!     * decode the event,
//!     * run it through the stages of the selected analysis variant, until
//!       one of them rejects it,
//!     * fill the histogram associated with the outcome
//! * then normalize, display and store the result.
//!
//! Events are independent, so they are processed in batches which can be
//! spread across threads (see the `multi-threading` feature). A faulty event
//! is skipped and counted, it never aborts the run.

#![warn(missing_docs)]

mod config;
mod event;
mod histogram;
mod kinematics;
mod numeric;
mod output;
mod pipeline;
mod recocut;
mod resacc;
mod resfin;
mod scheduling;
mod store;
mod truthcut;
mod variant;

use clap::Parser;
use eyre::WrapErr;

use crate::{
    config::{Cli, Configuration},
    pipeline::Selector,
    resacc::ResultsAccumulator,
    store::EventStore,
};

use std::time::Instant;

/// We'll use eyre's type-erased result type throughout the application
type Result<T> = eyre::Result<T>;

/// This will act as our main function, with suitable error handling
fn main() -> Result<()> {
    // ### CONFIGURATION READOUT ###

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .init();
    let cfg = Configuration::load(cli).wrap_err("Failed to load the configuration")?;

    // ### INPUT ###

    // Problems with the store as a whole are fatal, unlike problems with
    // individual events
    let store = EventStore::open(&cfg.infile)?;
    let pot_sum = store.pot_sum()?;

    // ### CLASSIFICATION ###

    let saved_time = Instant::now();
    let selector = Selector::new(&cfg);

    // This kernel classifies a range of events, and returns the accumulated
    // intermediary results
    let classify_events = |events: std::ops::Range<usize>| -> ResultsAccumulator {
        let mut accumulator = ResultsAccumulator::new(&cfg);
        for index in events {
            let classified = store
                .event(index)
                .and_then(|event| Ok((selector.classify(&event)?, event)));
            match classified {
                Ok((classification, event)) => accumulator.integrate(&event, classification),
                Err(error) => accumulator.skip(index, &error),
            }
        }
        accumulator
    };

    // Run the selection
    let accumulator = scheduling::run_selection(store.len(), classify_events);
    tracing::info!(
        processed = accumulator.processed_events(),
        events = store.len(),
        "classification done"
    );
    let results = accumulator.finalize(pot_sum);

    // ### RESULTS DISPLAY AND STORAGE ###

    let elapsed_time = saved_time.elapsed();
    output::dump_results(&cfg, &results, elapsed_time).wrap_err("Failed to output the results")?;

    // ...and we're done
    Ok(())
}
