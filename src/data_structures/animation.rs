//! Keyframe animation of mesh positions.
//!
//! An [`Animation`] is a list of keys on a frame axis with a frame rate. The
//! [`AnimationPlayer`] owns the running playbacks ([`Animatable`]s), advances
//! them with wall-clock time and writes the interpolated values back into the
//! [`Scene`].

use anyhow::{bail, ensure};
use cgmath::{Vector3, VectorSpace};

use crate::data_structures::scene_graph::{MeshId, Scene};

/// The mesh property an animation drives. Only positions are animated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetProperty {
    Position,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    pub frame: f32,
    pub value: Vector3<f32>,
}

#[derive(Clone, Debug)]
pub struct Animation {
    pub name: String,
    pub target_property: TargetProperty,
    /// Frames per second.
    pub frame_rate: f32,
    keys: Vec<Keyframe>,
}

impl Animation {
    pub fn new(name: &str, target_property: TargetProperty, frame_rate: f32) -> Self {
        Self {
            name: name.to_string(),
            target_property,
            frame_rate,
            keys: Vec::new(),
        }
    }

    pub fn set_keys(&mut self, keys: Vec<Keyframe>) -> anyhow::Result<()> {
        ensure!(
            keys.len() >= 2,
            "animation {} needs at least two keys, got {}",
            self.name,
            keys.len()
        );
        if keys.windows(2).any(|pair| pair[0].frame >= pair[1].frame) {
            bail!("keys of animation {} are not in ascending frame order", self.name);
        }
        self.keys = keys;
        Ok(())
    }

    /// Linear interpolation between the keys surrounding `frame`. Frames
    /// outside the key range clamp to the first or last key.
    pub fn evaluate(&self, frame: f32) -> Option<Vector3<f32>> {
        let first = self.keys.first()?;
        let last = self.keys.last()?;
        if frame <= first.frame {
            return Some(first.value);
        }
        if frame >= last.frame {
            return Some(last.value);
        }
        self.keys.windows(2).find_map(|pair| {
            let (from, to) = (pair[0], pair[1]);
            (frame >= from.frame && frame <= to.frame).then(|| {
                let t = (frame - from.frame) / (to.frame - from.frame);
                from.value.lerp(to.value, t)
            })
        })
    }
}

/// A running playback of animations on one mesh.
#[derive(Clone, Debug)]
pub struct Animatable {
    pub target: MeshId,
    pub animations: Vec<Animation>,
    pub from_frame: f32,
    pub to_frame: f32,
    pub looping: bool,
    elapsed_secs: f32,
}

impl Animatable {
    /// Current position on the frame axis for the given animation.
    fn frame_of(&self, animation: &Animation) -> f32 {
        let span = self.to_frame - self.from_frame;
        let advanced = self.elapsed_secs * animation.frame_rate;
        if self.looping && span > 0.0 {
            self.from_frame + advanced % span
        } else {
            (self.from_frame + advanced).min(self.to_frame)
        }
    }

    fn is_finished(&self) -> bool {
        !self.looping
            && self
                .animations
                .iter()
                .all(|animation| self.frame_of(animation) >= self.to_frame)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AnimationEvent {
    /// A non-looping playback reached its last frame.
    Ended { target: MeshId },
}

#[derive(Debug, Default)]
pub struct AnimationPlayer {
    running: Vec<Animatable>,
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts playing `animations` on `target`. A playback already running on
    /// the same mesh is replaced.
    ///
    /// Fails without touching the running playbacks if an animation could
    /// never advance or the frame range is reversed.
    pub fn begin_animation(
        &mut self,
        target: MeshId,
        animations: Vec<Animation>,
        from_frame: f32,
        to_frame: f32,
        looping: bool,
    ) -> anyhow::Result<()> {
        for animation in &animations {
            ensure!(
                animation.frame_rate.is_finite() && animation.frame_rate > 0.0,
                "animation {} has frame rate {}, expected a positive rate",
                animation.name,
                animation.frame_rate
            );
        }
        ensure!(
            from_frame <= to_frame,
            "cannot play frames {}..{} backwards",
            from_frame,
            to_frame
        );
        let names: Vec<_> = animations.iter().map(|a| a.name.as_str()).collect();
        log::info!(
            "Begin animation {:?} on {:?}, frames {}..{}",
            names,
            target,
            from_frame,
            to_frame
        );
        self.running.retain(|animatable| animatable.target != target);
        self.running.push(Animatable {
            target,
            animations,
            from_frame,
            to_frame,
            looping,
            elapsed_secs: 0.0,
        });
        Ok(())
    }

    pub fn stop_all_animations(&mut self) {
        if !self.running.is_empty() {
            log::debug!("Stopping {} running animation(s)", self.running.len());
        }
        self.running.clear();
    }

    pub fn is_animating(&self, target: MeshId) -> bool {
        self.running.iter().any(|animatable| animatable.target == target)
    }

    pub fn running(&self) -> &[Animatable] {
        &self.running
    }

    /// Advances every playback by `dt` seconds, applies the interpolated values
    /// to the scene and drops playbacks that have finished.
    pub fn advance(&mut self, dt: f32, scene: &mut Scene) -> Vec<AnimationEvent> {
        let mut events = Vec::new();
        for animatable in self.running.iter_mut() {
            animatable.elapsed_secs += dt;
            for animation in &animatable.animations {
                let frame = animatable.frame_of(animation);
                match (animation.target_property, animation.evaluate(frame)) {
                    (TargetProperty::Position, Some(position)) => {
                        scene.set_position(animatable.target, position)
                    }
                    (_, None) => log::warn!("Animation {} has no keys", animation.name),
                }
            }
            if animatable.is_finished() {
                events.push(AnimationEvent::Ended {
                    target: animatable.target,
                });
            }
        }
        self.running.retain(|animatable| !animatable.is_finished());
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::{
        material::{Color3, SolidColor},
        mesh::{MeshBuilder, SphereOptions},
    };

    fn move_along_x(frame_rate: f32) -> Animation {
        let mut animation = Animation::new("moveTo", TargetProperty::Position, frame_rate);
        animation
            .set_keys(vec![
                Keyframe {
                    frame: 0.0,
                    value: Vector3::new(0.0, 0.0, 0.0),
                },
                Keyframe {
                    frame: 10.0,
                    value: Vector3::new(10.0, 0.0, 0.0),
                },
            ])
            .unwrap();
        animation
    }

    fn scene_with_ball() -> (Scene, MeshId) {
        let mut scene = Scene::new();
        let ball = scene
            .create_mesh(
                MeshBuilder::create_sphere("ball", SphereOptions::default()),
                Vector3::new(0.0, 0.0, 0.0),
                SolidColor::make(Color3::WHITE),
            )
            .unwrap();
        (scene, ball)
    }

    #[test]
    fn evaluate_interpolates_linearly() {
        let animation = move_along_x(1.0);
        assert_eq!(animation.evaluate(5.0), Some(Vector3::new(5.0, 0.0, 0.0)));
        assert_eq!(animation.evaluate(2.5), Some(Vector3::new(2.5, 0.0, 0.0)));
    }

    #[test]
    fn evaluate_clamps_outside_keys() {
        let animation = move_along_x(1.0);
        assert_eq!(animation.evaluate(-3.0), Some(Vector3::new(0.0, 0.0, 0.0)));
        assert_eq!(animation.evaluate(42.0), Some(Vector3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn keys_must_be_ordered_and_plenty() {
        let mut animation = Animation::new("bad", TargetProperty::Position, 1.0);
        let key = |frame| Keyframe {
            frame,
            value: Vector3::new(0.0, 0.0, 0.0),
        };
        assert!(animation.set_keys(vec![key(0.0)]).is_err());
        assert!(animation.set_keys(vec![key(5.0), key(1.0)]).is_err());
        assert!(animation.evaluate(0.0).is_none());
    }

    #[test]
    fn player_moves_mesh_with_time() {
        let (mut scene, ball) = scene_with_ball();
        let mut player = AnimationPlayer::new();
        player.begin_animation(ball, vec![move_along_x(2.0)], 0.0, 10.0, false).unwrap();

        let events = player.advance(1.0, &mut scene);
        assert!(events.is_empty());
        assert_eq!(scene.absolute_position(ball), Some(Vector3::new(2.0, 0.0, 0.0)));
        assert!(player.is_animating(ball));
    }

    #[test]
    fn player_reports_end_and_drops_playback() {
        let (mut scene, ball) = scene_with_ball();
        let mut player = AnimationPlayer::new();
        player.begin_animation(ball, vec![move_along_x(1.0)], 0.0, 10.0, false).unwrap();

        let events = player.advance(12.0, &mut scene);
        assert_eq!(events, vec![AnimationEvent::Ended { target: ball }]);
        assert_eq!(scene.absolute_position(ball), Some(Vector3::new(10.0, 0.0, 0.0)));
        assert!(!player.is_animating(ball));
    }

    #[test]
    fn looping_playback_wraps_around() {
        let (mut scene, ball) = scene_with_ball();
        let mut player = AnimationPlayer::new();
        player.begin_animation(ball, vec![move_along_x(1.0)], 0.0, 10.0, true).unwrap();

        let events = player.advance(13.0, &mut scene);
        assert!(events.is_empty());
        assert_eq!(scene.absolute_position(ball), Some(Vector3::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn stop_all_freezes_position() {
        let (mut scene, ball) = scene_with_ball();
        let mut player = AnimationPlayer::new();
        player.begin_animation(ball, vec![move_along_x(1.0)], 0.0, 10.0, false).unwrap();
        player.advance(4.0, &mut scene);
        player.stop_all_animations();
        player.advance(4.0, &mut scene);
        assert_eq!(scene.absolute_position(ball), Some(Vector3::new(4.0, 0.0, 0.0)));
        assert!(player.running().is_empty());
    }

    #[test]
    fn beginning_again_replaces_previous_playback() {
        let (_, ball) = scene_with_ball();
        let mut player = AnimationPlayer::new();
        player.begin_animation(ball, vec![move_along_x(1.0)], 0.0, 10.0, false).unwrap();
        player.begin_animation(ball, vec![move_along_x(1.0)], 0.0, 10.0, false).unwrap();
        assert_eq!(player.running().len(), 1);
    }

    #[test]
    fn playback_that_cannot_advance_is_refused() {
        let (mut scene, ball) = scene_with_ball();
        let mut player = AnimationPlayer::new();
        player
            .begin_animation(ball, vec![move_along_x(1.0)], 0.0, 10.0, false)
            .unwrap();

        for rate in [0.0, -1.0, f32::NAN] {
            assert!(
                player
                    .begin_animation(ball, vec![move_along_x(rate)], 0.0, 10.0, false)
                    .is_err(),
                "accepted frame rate {}",
                rate
            );
        }
        assert!(
            player
                .begin_animation(ball, vec![move_along_x(1.0)], 10.0, 0.0, false)
                .is_err()
        );

        // the earlier playback keeps running and still ends
        assert_eq!(player.running().len(), 1);
        let events = player.advance(11.0, &mut scene);
        assert_eq!(events, vec![AnimationEvent::Ended { target: ball }]);
    }
}
