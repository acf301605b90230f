// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial classification: level-mismatch detection and attribute transfer
//!
//! Both operations are single linear passes over the subject set. Every
//! per-element failure (no geometry, dangling level reference, missing
//! source field) degrades to a counted skip on the report; only level-stack
//! preconditions abort. Decisions are buffered on the reports and applied
//! by the caller - the engine writes nothing.

use crate::{EngineOptions, LevelStack, SpatialIndex};
use bim_spatial_model::{
    BoundingBox, CancelToken, ElementId, ElementInfo, FieldValue, HostModel, LevelId, Result,
    LEVEL_REFERENCE_FIELDS,
};
use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Progress callback: (processed, total), invoked once per subject
pub type ProgressFn<'a> = dyn Fn(usize, usize) + 'a;

/// Terminal state of a single engine pass
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum RunStatus {
    /// Every subject was processed
    Completed,
    /// Cancellation was requested; decisions so far are valid and kept
    Cancelled,
}

/// A subject element paired with the level it claims
///
/// Produced by [`resolve_subject`]; the location check tests each record's
/// box against its declared level's inclusion volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    /// The element under check
    pub element: ElementId,
    /// Level id read from its first non-empty level-reference field
    pub declared_level: LevelId,
}

/// An element whose box does not intersect its declared level's volume
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    /// The flagged element
    pub element: ElementId,
    /// The level it claims but does not reach
    pub declared_level: LevelId,
}

/// Result of a location check pass
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationReport {
    /// Flagged elements, in subject encounter order
    pub mismatches: Vec<Mismatch>,
    /// Elements skipped for missing geometry
    pub unchecked: Vec<ElementId>,
    /// Elements skipped for a missing or unknown level reference
    pub unresolved: Vec<ElementId>,
    /// Number of subjects actually tested against a volume
    pub checked: usize,
    /// Completed or cancelled
    pub status: RunStatus,
}

/// One intersecting target with its transferred value
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetHit {
    /// The intersecting target element
    pub target: ElementId,
    /// The scalar attribute pulled from it
    pub value: f64,
}

/// A subject with all targets whose boxes intersect it
///
/// Hits are in target encounter order, not sorted by overlap. The value to
/// write is the last hit's: each intersecting target overwrites the staged
/// value unconditionally, so the last one processed wins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpatialMatch {
    /// The subject element
    pub subject: ElementId,
    /// Intersecting targets, encounter order
    pub hits: Vec<TargetHit>,
}

impl SpatialMatch {
    /// The value the caller writes onto the subject (last hit wins)
    pub fn final_value(&self) -> f64 {
        self.hits.last().map(|hit| hit.value).unwrap_or(0.0)
    }
}

/// Result of an attribute transfer pass
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferReport {
    /// Subjects with at least one intersecting target, encounter order
    pub matches: Vec<SpatialMatch>,
    /// Subjects intersecting zero targets (keep their zero sentinel)
    pub unmatched: Vec<ElementId>,
    /// Subjects skipped for missing geometry
    pub skipped_subjects: Vec<ElementId>,
    /// Targets dropped for missing geometry or a missing source field
    pub skipped_targets: Vec<ElementId>,
    /// Subjects processed before completion or cancellation
    pub processed: usize,
    /// Completed or cancelled
    pub status: RunStatus,
}

/// Resolve an element's declared level from the prioritized field list
///
/// Tries [`LEVEL_REFERENCE_FIELDS`] in order and returns the first
/// non-empty level reference.
pub fn resolve_level_reference(host: &dyn HostModel, element: ElementId) -> Option<LevelId> {
    LEVEL_REFERENCE_FIELDS
        .iter()
        .find_map(|name| host.field(element, name)?.as_level_ref())
}

/// Pair an element with its declared level, if one resolves
pub fn resolve_subject(host: &dyn HostModel, element: ElementId) -> Option<SubjectRecord> {
    resolve_level_reference(host, element).map(|declared_level| SubjectRecord {
        element,
        declared_level,
    })
}

/// Level-mismatch detection and spatial attribute transfer
#[derive(Debug, Clone, Default)]
pub struct AssignmentEngine {
    options: EngineOptions,
}

impl AssignmentEngine {
    /// Create an engine with the given options
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    /// The options this engine runs with
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Flag subjects whose box does not intersect their declared level's
    /// inclusion volume
    ///
    /// Subjects without geometry land in `unchecked`; subjects without a
    /// resolvable level reference, or referencing a level outside the
    /// stack, land in `unresolved`. Neither is a mismatch. The pass holds
    /// no state between invocations: the same input yields the same report.
    pub fn check_locations(
        &self,
        host: &dyn HostModel,
        subjects: &[ElementInfo],
        stack: &LevelStack,
        cancel: &CancelToken,
        progress: Option<&ProgressFn<'_>>,
    ) -> Result<LocationReport> {
        let volumes = stack.inclusion_volumes(host, self.options.top_clearance)?;

        let mut report = LocationReport {
            mismatches: Vec::new(),
            unchecked: Vec::new(),
            unresolved: Vec::new(),
            checked: 0,
            status: RunStatus::Completed,
        };

        for (i, subject) in subjects.iter().enumerate() {
            if cancel.is_cancelled() {
                report.status = RunStatus::Cancelled;
                break;
            }

            self.check_one(host, &volumes, subject.id, &mut report);

            // skipped subjects count as progress too, so it reaches total
            if let Some(progress) = progress {
                progress(i + 1, subjects.len());
            }
        }

        Ok(report)
    }

    fn check_one(
        &self,
        host: &dyn HostModel,
        volumes: &FxHashMap<LevelId, BoundingBox>,
        subject: ElementId,
        report: &mut LocationReport,
    ) {
        let record = match resolve_subject(host, subject) {
            Some(record) => record,
            None => {
                debug!("{subject} has no level reference, skipping");
                report.unresolved.push(subject);
                return;
            }
        };
        let volume = match volumes.get(&record.declared_level) {
            Some(volume) => volume,
            None => {
                debug!(
                    "{subject} references unknown level {}",
                    record.declared_level
                );
                report.unresolved.push(subject);
                return;
            }
        };
        let bbox = match host.bounding_box(subject) {
            Some(bbox) => bbox,
            None => {
                debug!("{subject} has no geometry, unchecked");
                report.unchecked.push(subject);
                return;
            }
        };

        report.checked += 1;
        if !volume.intersects(&bbox, 0.0) {
            report.mismatches.push(Mismatch {
                element: record.element,
                declared_level: record.declared_level,
            });
        }
    }

    /// Fold a numeric attribute from intersecting targets onto each subject
    ///
    /// For every subject box, all intersecting target boxes (tolerance 0)
    /// are recorded in target encounter order; the last one's value is what
    /// the caller writes. The caller stages a zero sentinel on the output
    /// field beforehand, so `unmatched` subjects keep zero. Cancellation is
    /// polled once per subject; decisions recorded up to that point stay on
    /// the report.
    pub fn transfer_attribute(
        &self,
        host: &dyn HostModel,
        subjects: &[ElementInfo],
        targets: &[ElementInfo],
        source_field: &str,
        cancel: &CancelToken,
        progress: Option<&ProgressFn<'_>>,
    ) -> TransferReport {
        let mut report = TransferReport {
            matches: Vec::new(),
            unmatched: Vec::new(),
            skipped_subjects: Vec::new(),
            skipped_targets: Vec::new(),
            processed: 0,
            status: RunStatus::Completed,
        };

        // Target boxes and values are fetched once; the index keeps target
        // encounter order so last-wins stays deterministic.
        let mut index = SpatialIndex::new(self.options.grid_cell_size);
        let mut values = Vec::new();
        for target in targets {
            let value = match host.field(target.id, source_field).as_ref().and_then(FieldValue::as_number) {
                Some(value) => value,
                None => {
                    debug!("target {} has no {source_field}, dropped", target.id);
                    report.skipped_targets.push(target.id);
                    continue;
                }
            };
            let bbox = match host.bounding_box(target.id) {
                Some(bbox) => bbox,
                None => {
                    debug!("target {} has no geometry, dropped", target.id);
                    report.skipped_targets.push(target.id);
                    continue;
                }
            };
            index.insert(target.id, bbox);
            values.push(value);
        }

        for (i, subject) in subjects.iter().enumerate() {
            if cancel.is_cancelled() {
                report.status = RunStatus::Cancelled;
                break;
            }

            let bbox = match host.bounding_box(subject.id) {
                Some(bbox) => bbox,
                None => {
                    debug!("subject {} has no geometry, skipped", subject.id);
                    report.skipped_subjects.push(subject.id);
                    continue;
                }
            };

            let hits: Vec<TargetHit> = index
                .query_slots(&bbox, 0.0)
                .into_iter()
                .map(|slot| TargetHit {
                    target: index.entry(slot).0,
                    value: values[slot],
                })
                .collect();

            if hits.is_empty() {
                report.unmatched.push(subject.id);
            } else {
                report.matches.push(SpatialMatch {
                    subject: subject.id,
                    hits,
                });
            }
            report.processed += 1;

            if let Some(progress) = progress {
                progress(i + 1, subjects.len());
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bim_spatial_model::{BoundingBox, Category, CategoryFilter, Level};
    use rustc_hash::FxHashMap;

    #[derive(Default)]
    struct MockHost {
        boxes: FxHashMap<ElementId, BoundingBox>,
        level_boxes: FxHashMap<LevelId, BoundingBox>,
        fields: FxHashMap<(ElementId, &'static str), FieldValue>,
    }

    impl HostModel for MockHost {
        fn bounding_box(&self, id: ElementId) -> Option<BoundingBox> {
            self.boxes.get(&id).copied()
        }
        fn level_bounding_box(&self, id: LevelId) -> Option<BoundingBox> {
            self.level_boxes.get(&id).copied()
        }
        fn field(&self, id: ElementId, name: &str) -> Option<FieldValue> {
            self.fields
                .iter()
                .find(|((eid, fname), _)| *eid == id && *fname == name)
                .map(|(_, value)| value.clone())
        }
        fn elements(&self, _filter: &CategoryFilter) -> Vec<ElementInfo> {
            Vec::new()
        }
        fn levels(&self) -> Vec<Level> {
            Vec::new()
        }
        fn to_internal_units(&self, value: f64) -> f64 {
            value
        }
        fn to_display_units(&self, value: f64) -> f64 {
            value
        }
    }

    fn bx(min: [f64; 3], max: [f64; 3]) -> BoundingBox {
        BoundingBox::new(min, max)
    }

    fn door(id: u64) -> ElementInfo {
        ElementInfo::new(ElementId(id), Category::Door, "Türelement")
    }

    fn floor(id: u64, name: &str) -> ElementInfo {
        ElementInfo::new(ElementId(id), Category::Floor, name)
    }

    fn two_story_host() -> (MockHost, LevelStack) {
        let mut host = MockHost::default();
        host.level_boxes
            .insert(LevelId(1), bx([0.0, 0.0, 0.0], [20.0, 20.0, 3.0]));
        host.level_boxes
            .insert(LevelId(2), bx([0.0, 0.0, 3.0], [20.0, 20.0, 6.0]));
        let stack = LevelStack::build(vec![
            Level::new(LevelId(1), "EG", 0.0, true),
            Level::new(LevelId(2), "OG 01", 3.0, true),
        ])
        .unwrap();
        (host, stack)
    }

    #[test]
    fn test_resolve_level_reference_priority() {
        let mut host = MockHost::default();
        host.fields.insert(
            (ElementId(1), "LEVEL_PARAM"),
            FieldValue::LevelRef(LevelId(9)),
        );
        host.fields.insert(
            (ElementId(1), "FAMILY_LEVEL_PARAM"),
            FieldValue::LevelRef(LevelId(3)),
        );
        // FAMILY_LEVEL_PARAM comes first in the priority list
        assert_eq!(
            resolve_level_reference(&host, ElementId(1)),
            Some(LevelId(3))
        );
        assert_eq!(resolve_level_reference(&host, ElementId(2)), None);
    }

    #[test]
    fn test_resolve_subject_pairs_declared_level() {
        let mut host = MockHost::default();
        host.fields.insert(
            (ElementId(5), "WALL_BASE_CONSTRAINT"),
            FieldValue::LevelRef(LevelId(2)),
        );
        assert_eq!(
            resolve_subject(&host, ElementId(5)),
            Some(SubjectRecord {
                element: ElementId(5),
                declared_level: LevelId(2),
            })
        );
        assert_eq!(resolve_subject(&host, ElementId(6)), None);
    }

    #[test]
    fn test_check_locations_intersecting_subject_passes() {
        let (mut host, stack) = two_story_host();
        // box z in [3.1, 5] against EG volume z in [0, 6]: intersects, no flag
        host.boxes
            .insert(ElementId(10), bx([1.0, 1.0, 3.1], [2.0, 2.0, 5.0]));
        host.fields.insert(
            (ElementId(10), "FAMILY_LEVEL_PARAM"),
            FieldValue::LevelRef(LevelId(1)),
        );

        let engine = AssignmentEngine::default();
        let report = engine
            .check_locations(&host, &[door(10)], &stack, &CancelToken::new(), None)
            .unwrap();
        assert!(report.mismatches.is_empty());
        assert_eq!(report.checked, 1);
        assert_eq!(report.status, RunStatus::Completed);
    }

    #[test]
    fn test_check_locations_flags_far_subject() {
        let (mut host, stack) = two_story_host();
        host.boxes
            .insert(ElementId(11), bx([1.0, 1.0, 10.0], [2.0, 2.0, 11.0]));
        host.fields.insert(
            (ElementId(11), "FAMILY_LEVEL_PARAM"),
            FieldValue::LevelRef(LevelId(1)),
        );

        let engine = AssignmentEngine::default();
        let report = engine
            .check_locations(&host, &[door(11)], &stack, &CancelToken::new(), None)
            .unwrap();
        assert_eq!(
            report.mismatches,
            vec![Mismatch {
                element: ElementId(11),
                declared_level: LevelId(1),
            }]
        );
    }

    #[test]
    fn test_check_locations_skips_are_observable() {
        let (mut host, stack) = two_story_host();
        // no box
        host.fields.insert(
            (ElementId(20), "FAMILY_LEVEL_PARAM"),
            FieldValue::LevelRef(LevelId(1)),
        );
        // unknown level
        host.boxes
            .insert(ElementId(21), bx([0.0; 3], [1.0; 3]));
        host.fields.insert(
            (ElementId(21), "FAMILY_LEVEL_PARAM"),
            FieldValue::LevelRef(LevelId(99)),
        );
        // no level field at all
        host.boxes
            .insert(ElementId(22), bx([0.0; 3], [1.0; 3]));

        let engine = AssignmentEngine::default();
        let report = engine
            .check_locations(
                &host,
                &[door(20), door(21), door(22)],
                &stack,
                &CancelToken::new(),
                None,
            )
            .unwrap();
        assert!(report.mismatches.is_empty());
        assert_eq!(report.unchecked, vec![ElementId(20)]);
        assert_eq!(report.unresolved, vec![ElementId(21), ElementId(22)]);
        assert_eq!(report.checked, 0);
    }

    #[test]
    fn test_check_locations_progress_covers_skipped_subjects() {
        let (mut host, stack) = two_story_host();
        // unresolved: box but no level field
        host.boxes.insert(ElementId(40), bx([0.0; 3], [1.0; 3]));
        // unchecked: level field but no box
        host.fields.insert(
            (ElementId(41), "FAMILY_LEVEL_PARAM"),
            FieldValue::LevelRef(LevelId(1)),
        );
        // checked
        host.boxes.insert(ElementId(42), bx([0.0; 3], [1.0; 3]));
        host.fields.insert(
            (ElementId(42), "FAMILY_LEVEL_PARAM"),
            FieldValue::LevelRef(LevelId(1)),
        );

        let seen = std::cell::RefCell::new(Vec::new());
        let progress = |done: usize, total: usize| {
            seen.borrow_mut().push((done, total));
        };
        let engine = AssignmentEngine::default();
        let report = engine
            .check_locations(
                &host,
                &[door(40), door(41), door(42)],
                &stack,
                &CancelToken::new(),
                Some(&progress),
            )
            .unwrap();
        assert_eq!(report.checked, 1);
        // monotone, one call per subject regardless of outcome
        assert_eq!(*seen.borrow(), vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn test_check_locations_idempotent() {
        let (mut host, stack) = two_story_host();
        for id in [30u64, 31, 32] {
            host.boxes
                .insert(ElementId(id), bx([1.0, 1.0, 10.0], [2.0, 2.0, 11.0]));
            host.fields.insert(
                (ElementId(id), "FAMILY_LEVEL_PARAM"),
                FieldValue::LevelRef(LevelId(1)),
            );
        }
        let subjects = vec![door(30), door(31), door(32)];
        let engine = AssignmentEngine::default();
        let first = engine
            .check_locations(&host, &subjects, &stack, &CancelToken::new(), None)
            .unwrap();
        let second = engine
            .check_locations(&host, &subjects, &stack, &CancelToken::new(), None)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_transfer_last_intersecting_target_wins() {
        let mut host = MockHost::default();
        // subject [0,1]x[0,1]x[0,0.2]
        host.boxes
            .insert(ElementId(1), bx([0.0, 0.0, 0.0], [1.0, 1.0, 0.2]));
        // two stacked floor slabs, both intersect the subject at tolerance 0
        host.boxes
            .insert(ElementId(100), bx([0.0, 0.0, 0.0], [1.0, 1.0, 0.1]));
        host.boxes
            .insert(ElementId(101), bx([0.0, 0.0, 0.1], [1.0, 1.0, 0.2]));
        host.fields.insert(
            (ElementId(100), "FLOOR_ATTR_THICKNESS_PARAM"),
            FieldValue::Number(0.1),
        );
        host.fields.insert(
            (ElementId(101), "FLOOR_ATTR_THICKNESS_PARAM"),
            FieldValue::Number(0.2),
        );

        let engine = AssignmentEngine::default();
        let report = engine.transfer_attribute(
            &host,
            &[door(1)],
            &[floor(100, "GFB 1"), floor(101, "GFB 2")],
            "FLOOR_ATTR_THICKNESS_PARAM",
            &CancelToken::new(),
            None,
        );

        assert_eq!(report.matches.len(), 1);
        let m = &report.matches[0];
        assert_eq!(m.hits.len(), 2);
        // the last processed target overwrites the earlier one
        assert_relative_eq!(m.final_value(), 0.2);
        assert_relative_eq!(m.hits[0].value, 0.1);
        assert_eq!(report.status, RunStatus::Completed);
    }

    #[test]
    fn test_transfer_unmatched_and_skips() {
        let mut host = MockHost::default();
        host.boxes
            .insert(ElementId(1), bx([50.0, 50.0, 0.0], [51.0, 51.0, 2.0]));
        // boxless subject
        // target with a box but no thickness field
        host.boxes
            .insert(ElementId(100), bx([0.0, 0.0, 0.0], [1.0, 1.0, 0.1]));

        let engine = AssignmentEngine::default();
        let report = engine.transfer_attribute(
            &host,
            &[door(1), door(2)],
            &[floor(100, "GFB 1")],
            "FLOOR_ATTR_THICKNESS_PARAM",
            &CancelToken::new(),
            None,
        );

        assert_eq!(report.unmatched, vec![ElementId(1)]);
        assert_eq!(report.skipped_subjects, vec![ElementId(2)]);
        assert_eq!(report.skipped_targets, vec![ElementId(100)]);
        assert!(report.matches.is_empty());
    }

    #[test]
    fn test_transfer_cancellation_keeps_partial_results() {
        let mut host = MockHost::default();
        let mut subjects = Vec::new();
        for id in 1..=10u64 {
            host.boxes
                .insert(ElementId(id), bx([0.0, 0.0, 0.0], [1.0, 1.0, 0.2]));
            subjects.push(door(id));
        }
        host.boxes
            .insert(ElementId(100), bx([0.0, 0.0, 0.0], [1.0, 1.0, 0.1]));
        host.fields.insert(
            (ElementId(100), "FLOOR_ATTR_THICKNESS_PARAM"),
            FieldValue::Number(0.1),
        );

        let token = CancelToken::new();
        let cancel_after_four = token.clone();
        let progress = move |done: usize, _total: usize| {
            if done == 4 {
                cancel_after_four.cancel();
            }
        };

        let engine = AssignmentEngine::default();
        let report = engine.transfer_attribute(
            &host,
            &subjects,
            &[floor(100, "GFB 1")],
            "FLOOR_ATTR_THICKNESS_PARAM",
            &token,
            Some(&progress),
        );

        assert_eq!(report.status, RunStatus::Cancelled);
        assert_eq!(report.processed, 4);
        assert_eq!(report.matches.len(), 4);
    }

    #[test]
    fn test_check_locations_missing_level_box_aborts() {
        let (mut host, stack) = two_story_host();
        host.level_boxes.remove(&LevelId(2));
        let engine = AssignmentEngine::default();
        let result = engine.check_locations(&host, &[], &stack, &CancelToken::new(), None);
        assert!(result.is_err());
    }
}
