//! 骨盤速度・踵高さ・XCoM (extrapolated centre of mass) の時系列
//!
//! 入力は1エージェント分のフレーム順の系列。時刻は frame / fps。

use std::collections::BTreeMap;

use nalgebra::Vector2;
use serde::Serialize;

use crate::error::{PoseError, Result};
use crate::trajectory::{SkeletonFrame, Trajectory};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedSample {
    /// 区間の中点時刻 (s)
    pub time: f64,
    /// 骨盤の3D速さ (m/s)
    pub speed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeelSample {
    pub time: f64,
    pub right: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct XcomSample {
    pub time: f64,
    pub pelvis: Vector2<f64>,
    pub xcom: Vector2<f64>,
}

/// 1エージェントの解析結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaitSeries {
    pub speeds: Vec<SpeedSample>,
    pub heels: Vec<HeelSample>,
    pub xcom: Vec<XcomSample>,
}

fn check_fps(fps: f64) -> Result<()> {
    if fps.is_finite() && fps > 0.0 {
        Ok(())
    } else {
        Err(PoseError::InvalidFps(fps))
    }
}

fn time_of(frame: &SkeletonFrame, fps: f64) -> f64 {
    frame.frame as f64 / fps
}

/// 隣接フレーム間の骨盤速さ
///
/// 時刻差が0以下の区間は捨てる
pub fn pelvis_speeds(series: &[SkeletonFrame], fps: f64) -> Result<Vec<SpeedSample>> {
    check_fps(fps)?;
    Ok(series
        .windows(2)
        .filter_map(|w| {
            let (t0, t1) = (time_of(&w[0], fps), time_of(&w[1], fps));
            let dt = t1 - t0;
            if dt <= 0.0 {
                return None;
            }
            Some(SpeedSample {
                time: (t0 + t1) / 2.0,
                speed: (w[1].pelvis - w[0].pelvis).norm() / dt,
            })
        })
        .collect())
}

pub fn heel_heights(series: &[SkeletonFrame], fps: f64) -> Result<Vec<HeelSample>> {
    check_fps(fps)?;
    Ok(series
        .iter()
        .map(|f| HeelSample {
            time: time_of(f, fps),
            right: f.heel_right.z,
            left: f.heel_left.z,
        })
        .collect())
}

/// XCoM = 骨盤xy + 骨盤速度xy / ω,  ω = sqrt(g / 初期骨盤高さ)
///
/// 速度は後退差分なので先頭フレームは出力しない
pub fn xcom(series: &[SkeletonFrame], fps: f64, gravity: f64) -> Result<Vec<XcomSample>> {
    check_fps(fps)?;
    let Some(first) = series.first() else {
        return Ok(Vec::new());
    };
    let pelvis_height = first.pelvis.z;
    if !(pelvis_height.is_finite() && pelvis_height > 0.0) {
        return Err(PoseError::InvalidHeight(pelvis_height));
    }
    let omega = (gravity / pelvis_height).sqrt();

    Ok(series
        .windows(2)
        .filter_map(|w| {
            let dt = time_of(&w[1], fps) - time_of(&w[0], fps);
            if dt <= 0.0 {
                return None;
            }
            let pelvis = w[1].pelvis.xy();
            let velocity = (pelvis - w[0].pelvis.xy()) / dt;
            Some(XcomSample {
                time: time_of(&w[1], fps),
                pelvis,
                xcom: pelvis + velocity / omega,
            })
        })
        .collect())
}

pub fn analyze_series(series: &[SkeletonFrame], fps: f64, gravity: f64) -> Result<GaitSeries> {
    Ok(GaitSeries {
        speeds: pelvis_speeds(series, fps)?,
        heels: heel_heights(series, fps)?,
        xcom: xcom(series, fps, gravity)?,
    })
}

/// 全エージェントを解析
pub fn analyze(trajectory: &Trajectory, fps: f64, gravity: f64) -> Result<BTreeMap<u64, GaitSeries>> {
    trajectory
        .agents()
        .into_iter()
        .map(|(agent_id, series)| Ok((agent_id, analyze_series(&series, fps, gravity)?)))
        .collect()
}
