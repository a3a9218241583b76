use std::collections::HashMap;

use sceneport_foreign::ForeignAnimation;
use sceneport_model::{NativeAnimationClip, NativeArmature, NativeTrack, TrackTarget, TrackValues};

use crate::diagnostics::{Component, DiagnosticKind, Diagnostics};

/// Tick rate assumed when the exporter left `ticks_per_second` unset.
const DEFAULT_TICKS_PER_SECOND: f64 = 25.0;

/// Converts one foreign animation into a native clip, or `None` when no
/// usable track survives filtering.
///
/// Keyframes with negative time, or with a time not strictly greater than
/// the previous surviving key, are dropped; some exporters emit both and the
/// rest of the channel is still worth keeping. A track left with fewer than
/// two keys is dropped entirely. Channel targets resolve against joints
/// first, then scene nodes.
pub fn build(
    animation: &ForeignAnimation,
    armature: Option<&NativeArmature>,
    node_index: &HashMap<String, u32>,
    diagnostics: &mut Diagnostics,
) -> Option<NativeAnimationClip> {
    let ticks_per_second = if animation.ticks_per_second > 0.0 {
        animation.ticks_per_second
    } else {
        DEFAULT_TICKS_PER_SECOND
    };
    let to_seconds = 1.0 / ticks_per_second;

    let mut tracks = Vec::new();

    for channel in &animation.channels {
        let target = match resolve_target(&channel.target, armature, node_index) {
            Some(target) => target,
            None => {
                diagnostics.record(
                    Component::Animation,
                    &animation.name,
                    DiagnosticKind::UnresolvedChannelTarget {
                        target: channel.target.clone(),
                    },
                );
                continue;
            }
        };

        let subject = format!("{}/{}", animation.name, channel.target);
        push_track(
            &mut tracks,
            target,
            filter_keys(
                channel.position_keys.iter().map(|key| (key.time, key.value)),
                to_seconds,
            ),
            TrackValues::Translations,
            &subject,
            diagnostics,
        );
        push_track(
            &mut tracks,
            target,
            filter_keys(
                channel.rotation_keys.iter().map(|key| (key.time, key.value)),
                to_seconds,
            ),
            TrackValues::Rotations,
            &subject,
            diagnostics,
        );
        push_track(
            &mut tracks,
            target,
            filter_keys(
                channel.scale_keys.iter().map(|key| (key.time, key.value)),
                to_seconds,
            ),
            TrackValues::Scales,
            &subject,
            diagnostics,
        );
    }

    for channel in &animation.morph_channels {
        let target = match node_index.get(&channel.target) {
            Some(&index) => TrackTarget::Node(index),
            None => {
                diagnostics.record(
                    Component::Animation,
                    &animation.name,
                    DiagnosticKind::UnresolvedChannelTarget {
                        target: channel.target.clone(),
                    },
                );
                continue;
            }
        };

        let weights_per_key = match channel.keys.first() {
            Some(key) => key.weights.len(),
            None => continue,
        };
        let subject = format!("{}/{}", animation.name, channel.target);

        // Keys whose weight vector disagrees with the first key are dropped
        // along with the degenerate-time ones.
        let consistent = channel
            .keys
            .iter()
            .filter(|key| key.weights.len() == weights_per_key)
            .map(|key| (key.time, key.weights.as_slice()));
        let mismatched = channel.keys.len()
            - channel
                .keys
                .iter()
                .filter(|key| key.weights.len() == weights_per_key)
                .count();

        let (times, values, dropped) = filter_keys(consistent, to_seconds);
        report_dropped(dropped + mismatched, &subject, diagnostics);

        if times.len() < 2 {
            diagnostics.record(
                Component::Animation,
                &subject,
                DiagnosticKind::ShortTrack { kept: times.len() },
            );
            continue;
        }

        let weights = values.into_iter().flatten().copied().collect();
        tracks.push(NativeTrack {
            target,
            times,
            values: TrackValues::MorphWeights {
                weights,
                weights_per_key,
            },
        });
    }

    if tracks.is_empty() {
        diagnostics.record(Component::Animation, &animation.name, DiagnosticKind::EmptyClip);
        return None;
    }

    let duration = tracks
        .iter()
        .filter_map(|track| track.times.last().copied())
        .fold(0.0f32, f32::max);

    Some(NativeAnimationClip {
        name: animation.name.clone(),
        duration,
        tracks,
    })
}

fn resolve_target(
    name: &str,
    armature: Option<&NativeArmature>,
    node_index: &HashMap<String, u32>,
) -> Option<TrackTarget> {
    if let Some(joint) = armature.and_then(|armature| armature.find_joint(name)) {
        return Some(TrackTarget::Joint(joint));
    }
    node_index.get(name).map(|&index| TrackTarget::Node(index))
}

/// Applies the keyframe-filtering policy and converts tick times to seconds.
/// Returns kept times, kept values, and the number of dropped keys.
fn filter_keys<V>(
    keys: impl Iterator<Item = (f64, V)>,
    to_seconds: f64,
) -> (Vec<f32>, Vec<V>, usize) {
    let mut times = Vec::new();
    let mut values = Vec::new();
    let mut dropped = 0;
    let mut last_kept: Option<f64> = None;

    for (time, value) in keys {
        let keep = time >= 0.0 && last_kept.map_or(true, |last| time > last);
        if keep {
            last_kept = Some(time);
            times.push((time * to_seconds) as f32);
            values.push(value);
        } else {
            dropped += 1;
        }
    }

    (times, values, dropped)
}

fn push_track<V>(
    tracks: &mut Vec<NativeTrack>,
    target: TrackTarget,
    filtered: (Vec<f32>, Vec<V>, usize),
    wrap: impl FnOnce(Vec<V>) -> TrackValues,
    subject: &str,
    diagnostics: &mut Diagnostics,
) {
    let (times, values, dropped) = filtered;
    let had_keys = !times.is_empty() || dropped > 0;
    report_dropped(dropped, subject, diagnostics);

    if times.len() < 2 {
        if had_keys {
            diagnostics.record(
                Component::Animation,
                subject,
                DiagnosticKind::ShortTrack { kept: times.len() },
            );
        }
        return;
    }

    tracks.push(NativeTrack {
        target,
        times,
        values: wrap(values),
    });
}

fn report_dropped(dropped: usize, subject: &str, diagnostics: &mut Diagnostics) {
    if dropped > 0 {
        diagnostics.record(
            Component::Animation,
            subject,
            DiagnosticKind::DroppedKeyframes { dropped },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use sceneport_foreign::animation::{ForeignChannel, ForeignMorphChannel, VectorKey, WeightKey};

    fn position_channel(target: &str, times: &[f64]) -> ForeignChannel {
        ForeignChannel {
            target: target.to_owned(),
            position_keys: times
                .iter()
                .map(|&time| VectorKey {
                    time,
                    value: Vec3::splat(time as f32),
                })
                .collect(),
            ..Default::default()
        }
    }

    fn node_index(names: &[&str]) -> HashMap<String, u32> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| ((*name).to_owned(), index as u32))
            .collect()
    }

    #[test]
    fn degenerate_keyframes_are_filtered_in_order() {
        let animation = ForeignAnimation {
            name: "walk".to_owned(),
            ticks_per_second: 1.0,
            channels: vec![position_channel("hip", &[0.0, -1.0, 2.0, 1.0, 3.0])],
            morph_channels: Vec::new(),
        };
        let nodes = node_index(&["hip"]);
        let mut diagnostics = Diagnostics::new(false);
        let clip = build(&animation, None, &nodes, &mut diagnostics).expect("clip");

        assert_eq!(clip.tracks.len(), 1);
        assert_eq!(clip.tracks[0].times, vec![0.0, 2.0, 3.0]);
        match &clip.tracks[0].values {
            TrackValues::Translations(values) => {
                assert_eq!(values.len(), 3);
                assert_eq!(values[1], Vec3::splat(2.0));
            }
            other => panic!("expected translations, got {other:?}"),
        }
        assert!(diagnostics
            .records()
            .iter()
            .any(|d| d.kind == DiagnosticKind::DroppedKeyframes { dropped: 2 }));
    }

    #[test]
    fn tick_times_convert_to_seconds() {
        let animation = ForeignAnimation {
            name: "turn".to_owned(),
            ticks_per_second: 30.0,
            channels: vec![position_channel("node", &[0.0, 15.0, 30.0])],
            morph_channels: Vec::new(),
        };
        let nodes = node_index(&["node"]);
        let mut diagnostics = Diagnostics::new(false);
        let clip = build(&animation, None, &nodes, &mut diagnostics).expect("clip");

        assert_eq!(clip.tracks[0].times, vec![0.0, 0.5, 1.0]);
        assert_eq!(clip.duration, 1.0);
    }

    #[test]
    fn single_key_track_is_dropped() {
        let animation = ForeignAnimation {
            name: "pose".to_owned(),
            ticks_per_second: 1.0,
            channels: vec![position_channel("node", &[0.0])],
            morph_channels: Vec::new(),
        };
        let nodes = node_index(&["node"]);
        let mut diagnostics = Diagnostics::new(false);
        assert!(build(&animation, None, &nodes, &mut diagnostics).is_none());
        assert!(diagnostics
            .records()
            .iter()
            .any(|d| matches!(d.kind, DiagnosticKind::ShortTrack { kept: 1 })));
        assert!(diagnostics
            .records()
            .iter()
            .any(|d| d.kind == DiagnosticKind::EmptyClip));
    }

    #[test]
    fn unresolved_target_drops_channel_not_clip() {
        let animation = ForeignAnimation {
            name: "walk".to_owned(),
            ticks_per_second: 1.0,
            channels: vec![
                position_channel("ghost", &[0.0, 1.0]),
                position_channel("hip", &[0.0, 1.0]),
            ],
            morph_channels: Vec::new(),
        };
        let nodes = node_index(&["hip"]);
        let mut diagnostics = Diagnostics::new(false);
        let clip = build(&animation, None, &nodes, &mut diagnostics).expect("clip");

        assert_eq!(clip.tracks.len(), 1);
        assert_eq!(clip.tracks[0].target, TrackTarget::Node(0));
        assert!(diagnostics
            .records()
            .iter()
            .any(|d| matches!(d.kind, DiagnosticKind::UnresolvedChannelTarget { .. })));
    }

    #[test]
    fn morph_channel_builds_weight_track() {
        let animation = ForeignAnimation {
            name: "blink".to_owned(),
            ticks_per_second: 1.0,
            channels: Vec::new(),
            morph_channels: vec![ForeignMorphChannel {
                target: "face".to_owned(),
                keys: vec![
                    WeightKey {
                        time: 0.0,
                        weights: vec![0.0, 0.0],
                    },
                    WeightKey {
                        time: 1.0,
                        weights: vec![1.0, 0.5],
                    },
                ],
            }],
        };
        let nodes = node_index(&["face"]);
        let mut diagnostics = Diagnostics::new(false);
        let clip = build(&animation, None, &nodes, &mut diagnostics).expect("clip");

        match &clip.tracks[0].values {
            TrackValues::MorphWeights {
                weights,
                weights_per_key,
            } => {
                assert_eq!(*weights_per_key, 2);
                assert_eq!(weights, &vec![0.0, 0.0, 1.0, 0.5]);
            }
            other => panic!("expected morph weights, got {other:?}"),
        }
    }
}
