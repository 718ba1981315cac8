// Keyframe animation for scene-graph nodes.
//
// A clip is a set of channels, each driving one TRS property of one node.
// The mixer plays a single clip on an endless loop; joints are ordinary
// nodes, so skinned meshes follow once their joint nodes are posed.

use glam::{Quat, Vec3};

use crate::core::scene::SceneGraph;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Step,
    /// Sampled linearly between key values; tangents are dropped at load.
    CubicSpline,
}

#[derive(Clone, Debug)]
pub enum Keyframes {
    Translation(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Scale(Vec<Vec3>),
}

#[derive(Clone, Debug)]
pub struct Channel {
    pub node: usize,
    pub times: Vec<f32>,
    pub keyframes: Keyframes,
    pub interpolation: Interpolation,
}

#[derive(Clone, Debug)]
pub struct AnimationClip {
    pub name: String,
    pub channels: Vec<Channel>,
    pub duration: f32,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, channels: Vec<Channel>) -> Self {
        let duration = channels
            .iter()
            .filter_map(|c| c.times.last().copied())
            .fold(0.0_f32, f32::max);
        Self {
            name: name.into(),
            channels,
            duration,
        }
    }
}

/// Locate `t` within `times`: the index of the segment start and the blend factor to the next key.
fn segment(times: &[f32], t: f32) -> (usize, f32) {
    let last = times.len().saturating_sub(1);
    if times.is_empty() || t <= times[0] {
        return (0, 0.0);
    }
    if t >= times[last] {
        return (last, 0.0);
    }
    let next = times.partition_point(|&k| k <= t);
    let i = next - 1;
    let span = times[next] - times[i];
    let alpha = if span > 0.0 { (t - times[i]) / span } else { 0.0 };
    (i, alpha)
}

impl Channel {
    fn blend_factor(&self, alpha: f32) -> f32 {
        match self.interpolation {
            Interpolation::Step => 0.0,
            Interpolation::Linear | Interpolation::CubicSpline => alpha,
        }
    }

    /// Write this channel's value at time `t` into the node's local transform.
    pub fn sample_into(&self, t: f32, graph: &mut SceneGraph) {
        let Some(node) = graph.nodes.get_mut(self.node) else {
            return;
        };
        let (i, alpha) = segment(&self.times, t);
        let a = self.blend_factor(alpha);
        let j = (i + 1).min(self.times.len().saturating_sub(1));
        match &self.keyframes {
            Keyframes::Translation(values) => {
                if let (Some(v0), Some(v1)) = (values.get(i), values.get(j)) {
                    node.local.translation = v0.lerp(*v1, a);
                }
            }
            Keyframes::Scale(values) => {
                if let (Some(v0), Some(v1)) = (values.get(i), values.get(j)) {
                    node.local.scale = v0.lerp(*v1, a);
                }
            }
            Keyframes::Rotation(values) => {
                if let (Some(q0), Some(q1)) = (values.get(i), values.get(j)) {
                    node.local.rotation = q0.slerp(*q1, a).normalize();
                }
            }
        }
    }
}

/// Plays one clip, looping forever.
#[derive(Clone, Debug)]
pub struct AnimationMixer {
    clip: AnimationClip,
    time: f32,
}

impl AnimationMixer {
    pub fn new(clip: AnimationClip) -> Self {
        Self { clip, time: 0.0 }
    }

    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn update(&mut self, dt_sec: f32) {
        if !dt_sec.is_finite() || dt_sec <= 0.0 {
            return;
        }
        self.time += dt_sec;
        if self.clip.duration > 0.0 {
            self.time = self.time.rem_euclid(self.clip.duration);
        }
    }

    pub fn apply(&self, graph: &mut SceneGraph) {
        for channel in &self.clip.channels {
            channel.sample_into(self.time, graph);
        }
    }
}
