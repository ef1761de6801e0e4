use clap::Parser;
use surfplot_core::PlotParams;
use surfplot_gui::{run_gui, GuiConfig};

#[derive(Parser, Debug)]
#[command(name = "surfplot", version, about = "Interactive 3D surface plotter")]
struct Cli {
    /// Initial function of x and y, e.g. "sin(x) * cos(y)"
    #[arg(long)]
    function: Option<String>,
    /// Window width in points
    #[arg(long)]
    width: Option<f32>,
    /// Window height in points
    #[arg(long)]
    height: Option<f32>,
}

impl Cli {
    fn gui_config(&self) -> GuiConfig {
        let mut config = GuiConfig::default();
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        config
    }

    fn plot_params(&self) -> PlotParams {
        let mut params = PlotParams::default();
        if let Some(function) = &self.function {
            params.function = function.clone();
        }
        params
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    log::debug!("{cli:?}");

    run_gui(cli.gui_config(), cli.plot_params())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_keep_defaults() {
        let cli = Cli::try_parse_from(["surfplot"]).unwrap();
        assert_eq!(cli.plot_params(), PlotParams::default());
        let config = cli.gui_config();
        assert_eq!(config.title, "Custom 3d plotter");
        assert_eq!((config.width, config.height), (1200.0, 800.0));
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "surfplot",
            "--function",
            "sin(x) + cos(y)",
            "--width",
            "640",
        ])
        .unwrap();
        assert_eq!(cli.plot_params().function, "sin(x) + cos(y)");
        assert_eq!(cli.plot_params().resolution, 20);
        assert_eq!(cli.gui_config().width, 640.0);
        assert_eq!(cli.gui_config().height, 800.0);
    }
}
