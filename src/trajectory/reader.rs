//! trajectory_data テーブルのCSVエクスポートを読み込む
//!
//! 例（ヘッダあり、28列）:
//! ```text
//! frame,id,pos_x,pos_y,ori_x,ori_y,head_pos_x,...,trunk_rotation_angle_y
//! 1,1,2.0,3.0,1.0,0.0,2.0,...,0.0
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{debug, trace};

use crate::config::TrajectoryConfig;
use crate::error::{PoseError, Result};
use crate::trajectory::frame::{column, SkeletonFrame};
use crate::trajectory::store::Trajectory;

pub struct TrajectoryReader {
    delimiter: u8,
    has_header: bool,
}

impl TrajectoryReader {
    pub fn new(delimiter: u8, has_header: bool) -> Self {
        Self { delimiter, has_header }
    }

    pub fn from_config(config: &TrajectoryConfig) -> Self {
        Self::new(config.delimiter_byte(), config.has_header)
    }

    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Trajectory> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading trajectory");
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }

    /// 全行を読み込む。1行でも不正ならエラー
    pub fn read<R: Read>(&self, reader: R) -> Result<Trajectory> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_header)
            .flexible(true)
            .from_reader(reader);

        let mut frames = Vec::new();
        let mut values = Vec::with_capacity(column::COUNT);

        for (row_idx, result) in csv_reader.records().enumerate() {
            let row = row_idx + 1;
            let record = result?;

            values.clear();
            for (col, field) in record.iter().enumerate() {
                let field = field.trim();
                if field.is_empty() {
                    return Err(PoseError::MalformedFrame {
                        row,
                        reason: format!("column {} is empty", col),
                    });
                }
                let v: f64 = field.parse().map_err(|e| PoseError::MalformedFrame {
                    row,
                    reason: format!("column {}: {} ({:?})", col, e, field),
                })?;
                values.push(v);
            }

            let frame = SkeletonFrame::from_row_at(&values, row)?;
            trace!(row, frame = frame.frame, agent_id = frame.agent_id, "parsed row");
            frames.push(frame);
        }

        debug!(rows = frames.len(), "trajectory loaded");
        Ok(Trajectory::new(frames))
    }
}

impl Default for TrajectoryReader {
    fn default() -> Self {
        Self::from_config(&TrajectoryConfig::default())
    }
}
