use crate::experiment::*;
use ansi_term::Color;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    /// One JSON object per line instead of a table
    pub json: bool,
    /// Paint significant p-values
    pub color: bool,
}

#[derive(Serialize)]
struct OutcomeRow {
    pairing: String,
    n_x: usize,
    n_y: usize,
    mean_x: f64,
    mean_y: f64,
    delta: f64,
    ci95: f64,
    statistic: f64,
    dof: f64,
    p_value: f64,
}

impl From<&Outcome> for OutcomeRow {
    fn from(x: &Outcome) -> OutcomeRow {
        OutcomeRow {
            pairing: x.pairing.to_string(),
            n_x: x.x.count,
            n_y: x.y.count,
            mean_x: x.x.mean,
            mean_y: x.y.mean,
            delta: x.delta(),
            ci95: x.ci95,
            statistic: x.test.statistic,
            dof: x.test.dof,
            p_value: x.test.p_value,
        }
    }
}

#[derive(Serialize)]
struct SummaryRow {
    pairing: String,
    trials: usize,
    mean_log10_p: f64,
    std_dev_log10_p: f64,
    min_p: f64,
    max_p: f64,
}

impl From<&Summary> for SummaryRow {
    fn from(x: &Summary) -> SummaryRow {
        let log_p = x.log_p();
        SummaryRow {
            pairing: x.pairing.to_string(),
            trials: x.trials(),
            mean_log10_p: log_p.mean,
            std_dev_log10_p: log_p.std_dev(),
            min_p: x.min_p(),
            max_p: x.max_p(),
        }
    }
}

fn paint_p(p: f64, color: bool) -> String {
    let s = format!("{:.3e}", p);
    if !color {
        s
    } else if p < 0.01 {
        Color::Red.paint(s).to_string()
    } else if p < 0.05 {
        Color::Yellow.paint(s).to_string()
    } else {
        s
    }
}

pub fn print_outcomes(mut out: impl Write, outcomes: &[Outcome], style: Style) -> Result<()> {
    if style.json {
        for x in outcomes {
            serde_json::to_writer(&mut out, &OutcomeRow::from(x))?;
            out.write_all(b"\n")?;
        }
        return Ok(());
    }
    let mut out = tabwriter::TabWriter::new(out).padding(2);
    writeln!(out, "pairing\tΔ\t95% CI\tt\tdof\tp-value")?;
    for x in outcomes {
        writeln!(
            out,
            "{}\t{:+.3}\t± {:.3}\t{:.3}\t{:.1}\t{}",
            x.pairing,
            x.delta(),
            x.ci95,
            x.test.statistic,
            x.test.dof,
            paint_p(x.test.p_value, style.color),
        )?;
    }
    out.flush()?;
    Ok(())
}

pub fn print_summaries(mut out: impl Write, summaries: &[Summary], style: Style) -> Result<()> {
    if style.json {
        for x in summaries {
            serde_json::to_writer(&mut out, &SummaryRow::from(x))?;
            out.write_all(b"\n")?;
        }
        return Ok(());
    }
    let mut out = tabwriter::TabWriter::new(out).padding(2);
    writeln!(out, "pairing\ttrials\tlog10(p)\tmin p\tmax p")?;
    for x in summaries {
        let row = SummaryRow::from(x);
        writeln!(
            out,
            "{}\t{}\t{:.2} ± {:.2}\t{}\t{}",
            row.pairing,
            row.trials,
            row.mean_log10_p,
            row.std_dev_log10_p,
            paint_p(row.min_p, style.color),
            paint_p(row.max_p, style.color),
        )?;
    }
    out.flush()?;
    Ok(())
}
