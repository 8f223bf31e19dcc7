use thiserror::Error;

/// 骨格再構成のエラー
///
/// 入力が不正な場合はデフォルト値で埋めずに呼び出し側へ返す
#[derive(Debug, Error)]
pub enum PoseError {
    /// 身長（または基準高さ）が正の有限値でない
    #[error("invalid height: {0} (must be a positive, finite value)")]
    InvalidHeight(f64),

    /// 比率テーブルに正でない値がある
    #[error("invalid anthropometric ratio `{name}`: {value}")]
    InvalidRatio { name: &'static str, value: f64 },

    /// 軌跡行の列数・値が不正
    #[error("malformed frame at row {row}: {reason}")]
    MalformedFrame { row: usize, reason: String },

    /// 正規化できない向きベクトル
    #[error("degenerate orientation for agent {agent_id} at frame {frame}")]
    DegenerateOrientation { frame: u64, agent_id: u64 },

    /// 関節木の構造が不正（親が存在しない・関節の重複）
    #[error("invalid kinematic tree: {reason}")]
    InvalidTree { reason: String },

    #[error("unknown joint `{0}`")]
    UnknownJoint(String),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid fps: {0}")]
    InvalidFps(f64),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PoseError>;
