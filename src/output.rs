//! This module is in charge of outputting the final classification results to
//! the standard output and to disk

use crate::{config::Configuration, resfin::FinalResults, Result};

use eyre::WrapErr;
use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::Path,
    time::Duration,
};

/// Layout of the result file
#[derive(Serialize)]
struct ResultFile<'res, 'cfg> {
    /// When the run ended
    timestamp: String,

    /// Input event store
    infile: &'res Path,

    /// Wall-clock duration of the classification (s)
    elapsed_secs: f64,

    #[serde(flatten)]
    results: &'res FinalResults<'cfg>,
}

/// Output the classification results to the console and to disk
pub fn dump_results(
    cfg: &Configuration,
    results: &FinalResults,
    elapsed_time: Duration,
) -> Result<()> {
    // Print out the cut flow on stdout
    results.print_cut_flow();

    // Compute a timestamp of when the run ended
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .wrap_err("Failed to format the run timestamp")?;

    // Write main results file
    {
        let file = File::create(&cfg.outfile)
            .wrap_err_with(|| format!("Failed to create {}", cfg.outfile.display()))?;
        let mut writer = BufWriter::new(file);
        let contents = ResultFile {
            timestamp,
            infile: &cfg.infile,
            elapsed_secs: elapsed_time.as_secs_f64(),
            results,
        };
        serde_json::to_writer_pretty(&mut writer, &contents)
            .wrap_err_with(|| format!("Failed to write {}", cfg.outfile.display()))?;
        writeln!(writer)?;
        writer.flush()?;
        tracing::info!(path = %cfg.outfile.display(), "results written");
    }

    // Append the flagged events of this run to the diagnostic side file
    if let Some(path) = &cfg.diagnostics {
        append_diagnostics(path, results)
            .wrap_err_with(|| format!("Failed to append to {}", path.display()))?;
    }

    // ...and we're done
    Ok(())
}

/// Append one line per flagged event to a cumulative text file
fn append_diagnostics(path: &Path, results: &FinalResults) -> Result<()> {
    if results.flagged.is_empty() {
        return Ok(());
    }
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut writer = BufWriter::new(file);
    for event in &results.flagged {
        writeln!(writer, "{}", FinalResults::diagnostic_line(event))?;
    }
    writer.flush()?;
    tracing::info!(
        path = %path.display(),
        events = results.flagged.len(),
        "flagged events appended"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        event::{testing::*, Event},
        kinematics::Position,
        pipeline::Selector,
        resacc::ResultsAccumulator,
        variant::VariantName,
    };
    use serde_json::Value;
    use std::{env, fs, process};

    /// Unique scratch path for one test
    fn scratch(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(format!("ncgamma_select-{}-{name}", process::id()))
    }

    fn muon_event(event_number: i32) -> Event {
        let mut event = signal_event();
        event.id.event = event_number;
        event.true_vertex = Position::new(120., 5., 400.);
        let vertex = event.true_vertex;
        event.sim_particles.push(sim(13, 40, 40, MUON_MASS, 250., vertex));
        event
    }

    #[test]
    fn result_file_and_diagnostics() {
        let mut cfg = Configuration::for_tests(VariantName::RecoPurity);
        cfg.outfile = scratch("results.json");
        let diagnostics = scratch("MuonFile.txt");
        let _ = fs::remove_file(&diagnostics);
        cfg.diagnostics = Some(diagnostics.clone());

        let selector = Selector::new(&cfg);
        let run = || {
            let mut acc = ResultsAccumulator::new(&cfg);
            for event in [muon_event(1), signal_event(), muon_event(3)] {
                acc.integrate(&event, selector.classify(&event).unwrap());
            }
            acc.finalize(2e19)
        };

        // Two runs append to the same side file
        dump_results(&cfg, &run(), Duration::from_millis(20)).unwrap();
        dump_results(&cfg, &run(), Duration::from_millis(20)).unwrap();

        let json: Value = serde_json::from_str(&fs::read_to_string(&cfg.outfile).unwrap()).unwrap();
        assert_eq!(json["variant"], "reco-purity");
        assert_eq!(json["processed_events"], 3);
        assert_eq!(json["histograms"].as_array().unwrap().len(), 24);
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
        assert!(json.get("flagged").is_none());

        let lines = fs::read_to_string(&diagnostics).unwrap();
        let lines = lines.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[1],
            "File ID:7, Run:5000, Subrun:12, Event: 3, Vertex Location (x,y,z): (120,5,400)"
        );

        let _ = fs::remove_file(&cfg.outfile);
        let _ = fs::remove_file(&diagnostics);
    }
}
