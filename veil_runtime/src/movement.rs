//! Waypoint routes and the per-NPC mover that walks them.
//!
//! The mover advances by `speed * dt` along straight legs between waypoints,
//! snapping to each waypoint's pose on arrival. One-shot routes fire their
//! completion hooks exactly once and then go idle; looping routes wrap from
//! the last waypoint back to the first and never complete.

use serde::{Deserialize, Serialize};

use crate::events::Hook;
use crate::math::{EulerDeg, Pose, Vec3};
use crate::ContentError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub position: Vec3,
    pub rotation: EulerDeg,
    /// Seconds to hold at this waypoint before moving on.
    #[serde(default)]
    pub wait_time: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointSet {
    pub id: String,
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub loop_route: bool,
    pub move_speed: f32,
    #[serde(default)]
    pub on_complete: Vec<Hook>,
}

impl WaypointSet {
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.waypoints.is_empty() {
            return Err(ContentError::EmptyWaypointSet {
                set: self.id.clone(),
            });
        }
        if self.move_speed <= 0.0 {
            return Err(ContentError::BadMoveSpeed {
                set: self.id.clone(),
                speed: self.move_speed,
            });
        }
        Ok(())
    }
}

/// What a single [`WaypointMover::advance`] call did.
#[derive(Debug, Clone, PartialEq)]
pub enum MoverStep {
    Idle,
    Moving,
    /// Reached waypoint `index`; `waiting` is true when the waypoint has a
    /// hold time and the mover is now parked there.
    Arrived { index: usize, waiting: bool },
    /// One-shot route exhausted. The route is dropped before this returns, so
    /// the hooks can fire at most once.
    Completed { set: String, hooks: Vec<Hook> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoverPhase {
    Idle,
    Moving,
    Waiting,
}

#[derive(Debug)]
enum Phase {
    Moving,
    Waiting { remaining: f32 },
}

#[derive(Debug)]
struct ActiveRoute {
    set: WaypointSet,
    cursor: usize,
    leg_start: Vec3,
    progress: f32,
    phase: Phase,
}

#[derive(Debug, Default)]
pub struct WaypointMover {
    active: Option<ActiveRoute>,
}

impl WaypointMover {
    pub fn new() -> Self {
        WaypointMover::default()
    }

    /// Begins walking `set` from `from`. Replaces any route in flight without
    /// firing its completion hooks. Returns false for an empty set.
    pub fn start(&mut self, set: WaypointSet, from: Vec3) -> bool {
        if set.waypoints.is_empty() {
            return false;
        }
        self.active = Some(ActiveRoute {
            set,
            cursor: 0,
            leg_start: from,
            progress: 0.0,
            phase: Phase::Moving,
        });
        true
    }

    /// Abandons the current route. Never fires completion hooks.
    pub fn stop(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_set(&self) -> Option<&str> {
        self.active.as_ref().map(|route| route.set.id.as_str())
    }

    pub fn move_speed(&self) -> Option<f32> {
        self.active.as_ref().map(|route| route.set.move_speed)
    }

    pub fn phase(&self) -> MoverPhase {
        match &self.active {
            None => MoverPhase::Idle,
            Some(route) => match route.phase {
                Phase::Moving => MoverPhase::Moving,
                Phase::Waiting { .. } => MoverPhase::Waiting,
            },
        }
    }

    pub fn advance(&mut self, dt: f32, pose: &mut Pose) -> MoverStep {
        let Some(route) = self.active.as_mut() else {
            return MoverStep::Idle;
        };
        match &mut route.phase {
            Phase::Waiting { remaining } => {
                *remaining -= dt;
                if *remaining > 0.0 {
                    return MoverStep::Arrived {
                        index: route.cursor,
                        waiting: true,
                    };
                }
                route.phase = Phase::Moving;
                self.next_leg(pose)
            }
            Phase::Moving => {
                route.progress += route.set.move_speed * dt;
                let target = &route.set.waypoints[route.cursor];
                let leg_len = route.leg_start.distance(target.position);
                if route.progress < leg_len {
                    pose.position = route
                        .leg_start
                        .lerp(target.position, route.progress / leg_len);
                    return MoverStep::Moving;
                }
                // Arrival: snap to the waypoint pose, then wait or move on.
                pose.position = target.position;
                pose.rotation = target.rotation;
                let index = route.cursor;
                if target.wait_time > 0.0 {
                    route.phase = Phase::Waiting {
                        remaining: target.wait_time,
                    };
                    return MoverStep::Arrived {
                        index,
                        waiting: true,
                    };
                }
                self.next_leg(pose)
            }
        }
    }

    /// Advances the cursor past an arrival, wrapping looped routes and
    /// retiring one-shot routes.
    fn next_leg(&mut self, pose: &mut Pose) -> MoverStep {
        let (arrived_at, exhausted) = {
            let Some(route) = self.active.as_mut() else {
                return MoverStep::Idle;
            };
            let arrived_at = route.cursor;
            if route.cursor + 1 < route.set.waypoints.len() {
                route.cursor += 1;
                (arrived_at, false)
            } else if route.set.loop_route {
                route.cursor = 0;
                (arrived_at, false)
            } else {
                (arrived_at, true)
            }
        };
        if exhausted {
            let Some(route) = self.active.take() else {
                return MoverStep::Idle;
            };
            return MoverStep::Completed {
                set: route.set.id,
                hooks: route.set.on_complete,
            };
        }
        let Some(route) = self.active.as_mut() else {
            return MoverStep::Idle;
        };
        route.leg_start = pose.position;
        route.progress = 0.0;
        MoverStep::Arrived {
            index: arrived_at,
            waiting: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{euler_y, vec3};

    fn wp(x: f32, z: f32) -> Waypoint {
        Waypoint {
            position: vec3(x, 0.0, z),
            rotation: euler_y(0.0),
            wait_time: 0.0,
        }
    }

    fn route(id: &str, waypoints: Vec<Waypoint>, loop_route: bool) -> WaypointSet {
        WaypointSet {
            id: id.into(),
            waypoints,
            loop_route,
            move_speed: 1.0,
            on_complete: vec![Hook::Mission {
                cue: crate::mission::MissionCue::FirstMeetingComplete,
            }],
        }
    }

    #[test]
    fn one_shot_route_completes_exactly_once() {
        let mut mover = WaypointMover::new();
        let mut pose = Pose::default();
        assert!(mover.start(route("exit", vec![wp(2.0, 0.0)], false), pose.position));
        let mut completions = 0;
        for _ in 0..10 {
            if let MoverStep::Completed { set, hooks } = mover.advance(0.5, &mut pose) {
                assert_eq!(set, "exit");
                assert_eq!(hooks.len(), 1);
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(pose.position, vec3(2.0, 0.0, 0.0));
        assert!(!mover.is_active());
    }

    #[test]
    fn looping_route_never_completes() {
        let mut mover = WaypointMover::new();
        let mut pose = Pose::default();
        mover.start(route("patrol", vec![wp(1.0, 0.0), wp(0.0, 0.0)], true), pose.position);
        for _ in 0..500 {
            let step = mover.advance(0.25, &mut pose);
            assert!(!matches!(step, MoverStep::Completed { .. }));
        }
        assert!(mover.is_active());
    }

    #[test]
    fn zero_distance_waypoint_arrives_on_the_next_tick() {
        let mut mover = WaypointMover::new();
        let mut pose = Pose::default();
        // First waypoint sits exactly where the mover starts.
        mover.start(route("still", vec![wp(0.0, 0.0), wp(1.0, 0.0)], false), pose.position);
        match mover.advance(0.1, &mut pose) {
            MoverStep::Arrived { index: 0, waiting: false } => {}
            step => panic!("expected immediate arrival, got {step:?}"),
        }
        assert!(mover.is_active());
    }

    #[test]
    fn wait_time_parks_the_mover() {
        let mut mover = WaypointMover::new();
        let mut pose = Pose::default();
        let mut set = route("pause", vec![wp(1.0, 0.0), wp(2.0, 0.0)], false);
        set.waypoints[0].wait_time = 1.0;
        mover.start(set, pose.position);
        assert_eq!(
            mover.advance(1.0, &mut pose),
            MoverStep::Arrived { index: 0, waiting: true }
        );
        assert_eq!(mover.phase(), MoverPhase::Waiting);
        assert_eq!(
            mover.advance(0.5, &mut pose),
            MoverStep::Arrived { index: 0, waiting: true }
        );
        // Hold expires and the next leg starts on the same tick.
        assert!(matches!(
            mover.advance(0.6, &mut pose),
            MoverStep::Arrived { index: 1, .. } | MoverStep::Moving | MoverStep::Completed { .. }
        ));
        assert_eq!(mover.phase(), MoverPhase::Moving);
    }

    #[test]
    fn stop_discards_the_route_without_hooks() {
        let mut mover = WaypointMover::new();
        let mut pose = Pose::default();
        mover.start(route("exit", vec![wp(5.0, 0.0)], false), pose.position);
        mover.advance(0.5, &mut pose);
        mover.stop();
        assert_eq!(mover.advance(10.0, &mut pose), MoverStep::Idle);
    }

    #[test]
    fn validation_rejects_empty_and_stalled_sets() {
        let empty = WaypointSet {
            id: "empty".into(),
            waypoints: vec![],
            loop_route: false,
            move_speed: 1.0,
            on_complete: vec![],
        };
        assert!(matches!(
            empty.validate(),
            Err(ContentError::EmptyWaypointSet { .. })
        ));
        let stalled = WaypointSet {
            move_speed: 0.0,
            ..route("stalled", vec![wp(1.0, 0.0)], false)
        };
        assert!(matches!(
            stalled.validate(),
            Err(ContentError::BadMoveSpeed { .. })
        ));
    }
}
