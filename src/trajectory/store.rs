use std::collections::BTreeMap;

use serde::Serialize;

use crate::trajectory::frame::SkeletonFrame;

/// 平面の範囲（描画軸の設定用）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

/// 読み込んだ全フレーム（frame, agent_id 順）
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    frames: Vec<SkeletonFrame>,
}

impl Trajectory {
    pub fn new(mut frames: Vec<SkeletonFrame>) -> Self {
        frames.sort_by_key(|f| (f.frame, f.agent_id));
        Self { frames }
    }

    pub fn frames(&self) -> &[SkeletonFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn max_frame(&self) -> Option<u64> {
        self.frames.last().map(|f| f.frame)
    }

    /// 重複なしのフレーム番号
    pub fn frame_numbers(&self) -> Vec<u64> {
        let mut numbers: Vec<u64> = self.frames.iter().map(|f| f.frame).collect();
        numbers.dedup();
        numbers
    }

    /// 指定フレームの全エージェント
    pub fn at_frame(&self, frame: u64) -> &[SkeletonFrame] {
        let start = self.frames.partition_point(|f| f.frame < frame);
        let end = self.frames.partition_point(|f| f.frame <= frame);
        &self.frames[start..end]
    }

    /// エージェントごとの時系列（フレーム順）
    pub fn agents(&self) -> BTreeMap<u64, Vec<SkeletonFrame>> {
        let mut agents: BTreeMap<u64, Vec<SkeletonFrame>> = BTreeMap::new();
        for frame in &self.frames {
            agents.entry(frame.agent_id).or_default().push(*frame);
        }
        agents
    }

    /// エージェント位置の範囲
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.frames.first()?;
        let init = Bounds {
            xmin: first.position.x,
            xmax: first.position.x,
            ymin: first.position.y,
            ymax: first.position.y,
        };
        Some(self.frames.iter().fold(init, |b, f| Bounds {
            xmin: b.xmin.min(f.position.x),
            xmax: b.xmax.max(f.position.x),
            ymin: b.ymin.min(f.position.y),
            ymax: b.ymax.max(f.position.y),
        }))
    }
}
