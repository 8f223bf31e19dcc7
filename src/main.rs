use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use humanoid_pose::config::Config;
use humanoid_pose::gait;
use humanoid_pose::kinematics::KinematicTree;
use humanoid_pose::render::{project_joints, Primitive, Projector};
use humanoid_pose::skeleton::JointAngles;
use humanoid_pose::trajectory::TrajectoryReader;

const CONFIG_PATH: &str = "config.toml";

#[derive(Parser)]
#[command(name = "humanoid-pose", version = env!("GIT_VERSION"))]
#[command(about = "Skeleton geometry and gait series from humanoid trajectories", long_about = None)]
struct Cli {
    /// 設定ファイル
    #[arg(short, long, default_value = CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project trajectory frames into labeled segments (JSON)
    Project {
        /// Trajectory CSV export
        trajectory: PathBuf,

        /// Only this frame
        #[arg(short, long)]
        frame: Option<u64>,
    },

    /// Evaluate the kinematic tree for the configured body (JSON)
    Pose {
        /// TOML file with `[joints]` name = { roll, pitch, yaw }
        #[arg(short, long)]
        angles: Option<PathBuf>,
    },

    /// Pelvis speed, heel height and XCoM series per agent (JSON)
    Gait {
        /// Trajectory CSV export
        trajectory: PathBuf,
    },
}

#[derive(Serialize)]
struct ProjectedFrame {
    frame: u64,
    agent_id: u64,
    primitives: Vec<Primitive>,
}

#[derive(Serialize)]
struct PoseOutput {
    joints: BTreeMap<&'static str, [f64; 3]>,
    segments: Vec<Primitive>,
}

fn load_angles(path: &PathBuf) -> Result<JointAngles> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    JointAngles::from_toml(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config);
    let profile = config.body.profile().context("invalid body configuration")?;
    info!(height = profile.height(), "body profile ready");

    match cli.command {
        Commands::Project { trajectory, frame } => {
            let trajectory = TrajectoryReader::from_config(&config.trajectory).read_path(&trajectory)?;
            let frames = match frame {
                Some(n) => trajectory.at_frame(n),
                None => trajectory.frames(),
            };
            info!(frames = frames.len(), max_frame = ?trajectory.max_frame(), "projecting");

            let projector = Projector::new(profile);
            let output = frames
                .iter()
                .map(|f| {
                    Ok(ProjectedFrame {
                        frame: f.frame,
                        agent_id: f.agent_id,
                        primitives: projector.project(f)?,
                    })
                })
                .collect::<humanoid_pose::Result<Vec<_>>>()?;
            print_json(&output)?;
        }
        Commands::Pose { angles } => {
            let angles = match angles {
                Some(path) => load_angles(&path)?,
                None => JointAngles::zero(),
            };
            let table = KinematicTree::lower_body().evaluate(&profile, &angles);
            let output = PoseOutput {
                joints: table.iter().map(|(j, p)| (j.name(), [p.x, p.y, p.z])).collect(),
                segments: project_joints(&table),
            };
            print_json(&output)?;
        }
        Commands::Gait { trajectory } => {
            let trajectory = TrajectoryReader::from_config(&config.trajectory).read_path(&trajectory)?;
            if let Some(bounds) = trajectory.bounds() {
                info!(?bounds, agents = trajectory.agents().len(), "trajectory extent");
            }
            let series = gait::analyze(&trajectory, config.trajectory.fps, config.gait.gravity)?;
            print_json(&series)?;
        }
    }

    Ok(())
}
