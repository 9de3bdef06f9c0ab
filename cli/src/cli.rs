use std::path::PathBuf;

use geoclust::{Contiguity, Linkage, WeightTransform};

/// Spatial clustering CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "geoclust", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Build the contiguity graph and report its structure
    Neighbors(NeighborsArgs),

    /// Global Moran's I for each attribute
    Moran(MoranArgs),

    /// Non-spatial k-means classification
    Kmeans(KMeansArgs),

    /// Contiguity-constrained regionalization
    Regionalize(RegionalizeArgs),

    /// Run every stage and write all outputs into a directory
    Run(RunArgs),
}

/// Where the areas come from and how they connect.
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Polygon layer (.geojson, .json or .shp)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// JSON analysis config; flags below override its fields
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Property or field holding the area identifier
    #[arg(long)]
    pub id_column: Option<String>,

    /// Attribute CSV joined onto the layer by identifier
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub join: Option<PathBuf>,

    /// Identifier column of the joined CSV, defaults to --id-column or "id"
    #[arg(long, requires = "join")]
    pub join_column: Option<String>,

    /// Attribute columns to use (comma separated), defaults to all numeric columns
    #[arg(short, long, value_delimiter = ',')]
    pub attributes: Vec<String>,

    /// Contiguity rule
    #[arg(long, value_enum)]
    pub contiguity: Option<RuleArg>,

    /// Boundary contact tolerance in coordinate units
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Seed for every randomized stage
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct NeighborsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the edge list as JSON
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct MoranArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output table, defaults to "./moran.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Number of random permutations for the pseudo p-value
    #[arg(short, long)]
    pub permutations: Option<usize>,

    /// Spatial weight transform
    #[arg(short, long, value_enum)]
    pub weights: Option<WeightsArg>,
}

#[derive(clap::Args, Debug)]
pub struct KMeansArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output label table, defaults to "./kmeans.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Also draw the classification as SVG
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub svg: Option<PathBuf>,

    /// Number of clusters
    #[arg(short)]
    pub k: Option<usize>,

    /// Number of seeded restarts
    #[arg(long)]
    pub restarts: Option<usize>,

    /// Z-score attribute columns first
    #[arg(long)]
    pub standardize: bool,
}

#[derive(clap::Args, Debug)]
pub struct RegionalizeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output label table, defaults to "./regions.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Also write dissolved region polygons as GeoJSON
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub regions: Option<PathBuf>,

    /// Also draw the regions as SVG
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub svg: Option<PathBuf>,

    /// Number of regions
    #[arg(short)]
    pub k: Option<usize>,

    /// Cluster dissimilarity
    #[arg(short, long, value_enum)]
    pub linkage: Option<LinkageArg>,

    /// Z-score attribute columns first
    #[arg(long)]
    pub standardize: bool,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output directory, defaults to "./geoclust-out"
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Alternate partition drawn as outlines and crosswalked
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub overlay: Option<PathBuf>,

    /// Identifier property of the overlay layer
    #[arg(long, requires = "overlay")]
    pub overlay_id_column: Option<String>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum RuleArg { Queen, Rook }

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum WeightsArg { Row, Binary }

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum LinkageArg { Ward, Average, Complete, Single }

impl From<RuleArg> for Contiguity {
    fn from(rule: RuleArg) -> Self {
        match rule {
            RuleArg::Queen => Contiguity::Queen,
            RuleArg::Rook => Contiguity::Rook,
        }
    }
}

impl From<WeightsArg> for WeightTransform {
    fn from(weights: WeightsArg) -> Self {
        match weights {
            WeightsArg::Row => WeightTransform::Row,
            WeightsArg::Binary => WeightTransform::Binary,
        }
    }
}

impl From<LinkageArg> for Linkage {
    fn from(linkage: LinkageArg) -> Self {
        match linkage {
            LinkageArg::Ward => Linkage::Ward,
            LinkageArg::Average => Linkage::Average,
            LinkageArg::Complete => Linkage::Complete,
            LinkageArg::Single => Linkage::Single,
        }
    }
}
