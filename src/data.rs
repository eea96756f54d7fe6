use serde::{Deserialize, Serialize};
use std::fmt;

// Type aliases for clarity
pub type ScheduleId = u32;
pub type TaskId = u32;
pub type TeacherId = u32;
pub type ClassroomId = u32;
pub type ClassId = u32;
pub type WeekDay = u32;
pub type TimeSlot = u32;

/// One resolved placement of a teaching task: a teacher in a classroom on a
/// given week day, occupying `slots_count` consecutive slots from `start_slot`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub schedule_id: ScheduleId,
    pub task_id: TaskId,
    pub teacher_id: TeacherId,
    pub classroom_id: ClassroomId,
    pub week_day: WeekDay,
    pub start_slot: TimeSlot,
    pub slots_count: u32,
    pub course_name: String,
    pub teacher_name: String,
    pub classroom_name: String,
}

/// One row of the many-to-many task-to-class relation. A task linked to
/// several classes is a merged session covering all of them at once.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskClassLink {
    pub task_id: TaskId,
    pub class_id: ClassId,
    pub class_name: String,
}

/// How to treat an assignment whose task is linked to no class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UnlinkedTaskPolicy {
    /// Valid administrative block; contributes nothing to the class dimension.
    #[default]
    Allow,
    /// Surfaced as an invalid record and excluded from the report.
    Reject,
}

/// Knobs for a single analysis run.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOptions {
    #[serde(default)]
    pub unlinked_tasks: UnlinkedTaskPolicy,
}

/// The complete input for one conflict analysis: a materialized snapshot of
/// one schedule version plus its task-class expansion table.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInput {
    pub assignments: Vec<Assignment>,
    pub task_classes: Vec<TaskClassLink>,
    #[serde(default)]
    pub options: AnalysisOptions,
}

/// One colliding occupant inside a conflict, with everything the consumer
/// needs to describe it without re-joining.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictEntry {
    pub schedule_id: ScheduleId,
    pub course: String,
    pub teacher: String,
    pub classroom: String,
    /// Only set for class-dimension occupancy.
    pub class_name: Option<String>,
}

/// Two or more occupants claiming the same resource at the same
/// (week day, slot) cell. Entries keep original input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub resource_id: u32,
    pub resource_name: String,
    pub week_day: WeekDay,
    pub slot: TimeSlot,
    pub entries: Vec<ConflictEntry>,
}

/// An assignment row that failed validity checks and was excluded from the
/// analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidRecord {
    pub schedule_id: ScheduleId,
    pub task_id: TaskId,
    pub reason: String,
}

impl fmt::Display for InvalidRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "assignment {} (task {}): {}",
            self.schedule_id, self.task_id, self.reason
        )
    }
}

/// The final output of the analyzer: one ordered conflict list per resource
/// dimension. An empty list means no conflicts in that dimension. Day and
/// slot stay numeric; display names are a consumer concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub class_conflicts: Vec<Conflict>,
    pub teacher_conflicts: Vec<Conflict>,
    pub classroom_conflicts: Vec<Conflict>,
    pub invalid_records: Vec<InvalidRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_to_allowing_unlinked_tasks() {
        let input: AnalysisInput =
            serde_json::from_str(r#"{"assignments":[],"taskClasses":[]}"#).unwrap();
        assert_eq!(input.options.unlinked_tasks, UnlinkedTaskPolicy::Allow);
    }
}
