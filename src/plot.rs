//! Figures are drawn by piping a gnuplot script into a `gnuplot` process.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::info;

use crate::{
    analyzer::{ARRIVAL_SWEEP_FILE, AVERAGES_FILE, DEPARTURE_SWEEP_FILE},
    error::{Result, SimError},
    parser::ExperimentConfig,
};

/// One figure: a title, axis labels, the png to produce and the plot command.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    pub zlabel: Option<String>,
    pub output: String,
    pub command: String,
}

impl Figure {
    fn write_commands<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "set title '{}'", self.title)?;
        writeln!(out, "set xlabel '{}'", self.xlabel)?;
        writeln!(out, "set ylabel '{}'", self.ylabel)?;
        if let Some(zlabel) = &self.zlabel {
            writeln!(out, "set zlabel '{}'", zlabel)?;
        }
        writeln!(out, "set datafile commentschars '#'")?;
        writeln!(out, "set style data lp")?;
        writeln!(out, "set term png")?;
        writeln!(out, "set output '{}'", self.output)?;
        writeln!(out, "{}", self.command)?;
        writeln!(out, "clear")
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlotScript {
    figures: Vec<Figure>,
}

impl PlotScript {
    /// The four figures of the standard experiments. File names are relative
    /// to the output directory, which is where gnuplot runs.
    pub fn for_experiments(config: &ExperimentConfig) -> Self {
        let avg = &config.average;
        let arr = &config.arrival_sweep;
        let dep = &config.departure_sweep;
        let dep_title = format!("Variable Departure Rates (λ = {})", dep.arrival_rate);
        Self {
            figures: vec![
                Figure {
                    title: format!(
                        "Averages (λ = {}, μ_a = {}, μ_b = {})",
                        avg.arrival_rate, avg.server_a_rate, avg.server_b_rate
                    ),
                    xlabel: "Steps".into(),
                    ylabel: "Average State Probability".into(),
                    zlabel: None,
                    output: "averages.png".into(),
                    command: format!("plot '{AVERAGES_FILE}' notitle"),
                },
                Figure {
                    title: format!(
                        "Variable Arrival Rate (μ_a = {}, μ_b = {})",
                        arr.server_a_rate, arr.server_b_rate
                    ),
                    xlabel: "λ".into(),
                    ylabel: String::new(),
                    zlabel: None,
                    output: "var_arr.png".into(),
                    command: format!(
                        "plot '{ARRIVAL_SWEEP_FILE}' using 1:2 t 'Average State', \
                         '{ARRIVAL_SWEEP_FILE}' using 1:3 t 'Throughput'"
                    ),
                },
                Figure {
                    title: dep_title.clone(),
                    xlabel: "μ_a".into(),
                    ylabel: "μ_b".into(),
                    zlabel: Some(String::new()),
                    output: "var_dep_average.png".into(),
                    command: format!(
                        "splot '{DEPARTURE_SWEEP_FILE}' using 1:2:3 t 'Average State'"
                    ),
                },
                Figure {
                    title: dep_title,
                    xlabel: "μ_a".into(),
                    ylabel: "μ_b".into(),
                    zlabel: Some(String::new()),
                    output: "var_dep_throughput.png".into(),
                    command: format!(
                        "splot '{DEPARTURE_SWEEP_FILE}' using 1:2:4 t 'Throughput'"
                    ),
                },
            ],
        }
    }

    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for figure in &self.figures {
            figure.write_commands(out)?;
        }
        Ok(())
    }
}

/// Handle on the external `gnuplot` program.
pub struct Gnuplot {
    program: String,
    working_dir: PathBuf,
}

impl Gnuplot {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: String::from("gnuplot"),
            working_dir: working_dir.into(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Feeds the whole script to one gnuplot process and waits for it.
    pub fn render(&self, script: &PlotScript) -> Result<()> {
        let mut child = Command::new(&self.program)
            .current_dir(&self.working_dir)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| SimError::Plot(format!("can't open {}: {e}", self.program)))?;

        // stdin is closed at the end of the match so gnuplot sees EOF.
        let written = match child.stdin.take() {
            Some(mut stdin) => script
                .write_to(&mut stdin)
                .map_err(|e| format!("writing script: {e}")),
            None => Err(String::from("gnuplot stdin is not piped")),
        };
        if let Err(reason) = written {
            // Reap the child, it may already have exited.
            let _ = child.kill();
            let _ = child.wait();
            return Err(SimError::Plot(reason));
        }

        let status = child
            .wait()
            .map_err(|e| SimError::Plot(format!("waiting for {}: {e}", self.program)))?;
        if !status.success() {
            return Err(SimError::Plot(format!("{} exited with {status}", self.program)));
        }
        info!(
            figures = script.figures().len(),
            dir = %self.working_dir.display(),
            "rendered figures"
        );
        Ok(())
    }
}
