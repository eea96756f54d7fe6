use crate::data::{
    AnalysisInput, Assignment, ClassId, ClassroomId, Conflict, ConflictEntry, ConflictReport,
    InvalidRecord, TaskClassLink, TaskId, TeacherId, TimeSlot, UnlinkedTaskPolicy, WeekDay,
};
use itertools::Itertools;
use log::{info, trace};
use std::collections::HashMap;
use std::time::Instant;
use thiserror::Error;

/// The atomic unit of time contention: a (week day, slot) pair.
pub type TimeCell = (WeekDay, TimeSlot);

/// Why an assignment row was excluded from the audit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAssignment {
    #[error("slot count must be at least 1, got {0}")]
    EmptyDuration(u32),
    #[error("start slot must be at least 1, got {0}")]
    StartSlotTooLow(TimeSlot),
    #[error("week day {0} is outside the 1-7 range")]
    WeekDayOutOfRange(WeekDay),
    #[error("task {0} is linked to no class")]
    UnlinkedTask(TaskId),
}

/// All bookings attributed to one resource instance, with its display name.
#[derive(Debug, Default)]
struct Lane {
    resource_name: String,
    bookings: Vec<(TimeCell, ConflictEntry)>,
}

impl Lane {
    fn named(name: &str) -> Self {
        Self {
            resource_name: name.to_string(),
            bookings: Vec::new(),
        }
    }
}

/// The three per-dimension occupancy indices, plus the rows that never made
/// it in.
#[derive(Debug, Default)]
struct ResourceIndices {
    classes: HashMap<ClassId, Lane>,
    teachers: HashMap<TeacherId, Lane>,
    classrooms: HashMap<ClassroomId, Lane>,
    invalid: Vec<InvalidRecord>,
}

/// Audits one schedule snapshot for double-bookings across the class,
/// teacher and classroom dimensions.
pub fn analyze(input: &AnalysisInput) -> ConflictReport {
    let start_time = Instant::now();
    info!(
        "Auditing {} assignments against {} task-class links...",
        input.assignments.len(),
        input.task_classes.len()
    );

    let indices = build_indices(input);
    trace!(
        "Indexed occupancy into {} class, {} teacher and {} classroom lanes ({} rows skipped).",
        indices.classes.len(),
        indices.teachers.len(),
        indices.classrooms.len(),
        indices.invalid.len()
    );

    // the three dimensions are independent; each pass reads only its own index
    let report = ConflictReport {
        class_conflicts: detect_in_dimension(&indices.classes),
        teacher_conflicts: detect_in_dimension(&indices.teachers),
        classroom_conflicts: detect_in_dimension(&indices.classrooms),
        invalid_records: indices.invalid,
    };

    info!(
        "Audit finished in {:.2?}: {} class, {} teacher, {} classroom conflicts.",
        start_time.elapsed(),
        report.class_conflicts.len(),
        report.teacher_conflicts.len(),
        report.classroom_conflicts.len()
    );
    report
}

/// Expands one assignment into the cells it occupies: one per slot in
/// `[start_slot, start_slot + slots_count - 1]` on its week day.
pub fn occupied_cells(assignment: &Assignment) -> Result<Vec<TimeCell>, InvalidAssignment> {
    if assignment.slots_count < 1 {
        return Err(InvalidAssignment::EmptyDuration(assignment.slots_count));
    }
    if assignment.start_slot < 1 {
        return Err(InvalidAssignment::StartSlotTooLow(assignment.start_slot));
    }
    if !(1..=7).contains(&assignment.week_day) {
        return Err(InvalidAssignment::WeekDayOutOfRange(assignment.week_day));
    }

    let end_slot = assignment.start_slot + assignment.slots_count - 1;
    Ok((assignment.start_slot..=end_slot)
        .map(|slot| (assignment.week_day, slot))
        .collect())
}

fn descriptor(assignment: &Assignment, class_name: Option<&str>) -> ConflictEntry {
    ConflictEntry {
        schedule_id: assignment.schedule_id,
        course: assignment.course_name.clone(),
        teacher: assignment.teacher_name.clone(),
        classroom: assignment.classroom_name.clone(),
        class_name: class_name.map(str::to_owned),
    }
}

fn build_indices(input: &AnalysisInput) -> ResourceIndices {
    // task -> linked classes lookup
    let links_by_task: HashMap<TaskId, Vec<&TaskClassLink>> = input
        .task_classes
        .iter()
        .map(|link| (link.task_id, link))
        .into_group_map();

    let mut indices = ResourceIndices::default();

    for assignment in &input.assignments {
        let cells = match occupied_cells(assignment) {
            Ok(cells) => cells,
            Err(reason) => {
                indices.invalid.push(InvalidRecord {
                    schedule_id: assignment.schedule_id,
                    task_id: assignment.task_id,
                    reason: reason.to_string(),
                });
                continue;
            }
        };

        let linked: &[&TaskClassLink] = links_by_task
            .get(&assignment.task_id)
            .map(|links| links.as_slice())
            .unwrap_or_default();

        if linked.is_empty() && input.options.unlinked_tasks == UnlinkedTaskPolicy::Reject {
            indices.invalid.push(InvalidRecord {
                schedule_id: assignment.schedule_id,
                task_id: assignment.task_id,
                reason: InvalidAssignment::UnlinkedTask(assignment.task_id).to_string(),
            });
            continue;
        }

        // class dimension: one expansion per linked class
        for link in linked {
            indices
                .classes
                .entry(link.class_id)
                .or_insert_with(|| Lane::named(&link.class_name))
                .bookings
                .extend(cells.iter().map(|&cell| {
                    (cell, descriptor(assignment, Some(link.class_name.as_str())))
                }));
        }

        // teacher and classroom dimensions: exactly one expansion each
        indices
            .teachers
            .entry(assignment.teacher_id)
            .or_insert_with(|| Lane::named(&assignment.teacher_name))
            .bookings
            .extend(cells.iter().map(|&cell| (cell, descriptor(assignment, None))));

        indices
            .classrooms
            .entry(assignment.classroom_id)
            .or_insert_with(|| Lane::named(&assignment.classroom_name))
            .bookings
            .extend(cells.iter().map(|&cell| (cell, descriptor(assignment, None))));
    }

    indices
}

/// Flags every (resource, cell) claimed by two or more bookings. Output is
/// sorted by week day, then slot, then resource id; entries inside a
/// conflict keep the input order of their assignments.
fn detect_in_dimension(index: &HashMap<u32, Lane>) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for (&resource_id, lane) in index {
        let by_cell: HashMap<TimeCell, Vec<&ConflictEntry>> = lane
            .bookings
            .iter()
            .map(|(cell, entry)| (*cell, entry))
            .into_group_map();

        for ((week_day, slot), entries) in by_cell {
            if entries.len() < 2 {
                continue;
            }
            conflicts.push(Conflict {
                resource_id,
                resource_name: lane.resource_name.clone(),
                week_day,
                slot,
                entries: entries.into_iter().cloned().collect(),
            });
        }
    }

    conflicts.sort_by_key(|conflict| (conflict.week_day, conflict.slot, conflict.resource_id));
    conflicts
}
