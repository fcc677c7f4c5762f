//! Plain-text rendering of API responses for the terminal.

use rosary_core::{
  assignment::AssignmentStatus,
  intention::Intention,
  ledger::Rotation,
  mystery::Mystery,
  roster::{Group, MemberAssignment, Profile},
};

pub fn mystery_line(m: &Mystery) -> String {
  format!("{:>2}. {} ({})", m.id.get(), m.name, m.part)
}

/// A member's assignment. Lookup failures read the same as no assignment.
pub fn assignment(status: &AssignmentStatus) -> String {
  match status {
    AssignmentStatus::Assigned { mystery } => {
      format!("{}\n    {}", mystery_line(mystery), mystery.meditation)
    }
    AssignmentStatus::Unassigned | AssignmentStatus::ComputeError { .. } => {
      "No mystery assigned".to_string()
    }
  }
}

pub fn group_line(g: &Group) -> String {
  format!("{:>4}  {:<32} generation {}", g.id, g.name, g.generation)
}

pub fn profile_line(p: &Profile) -> String {
  let seat = match p.seat() {
    Some((group, pos)) => format!("group {group} seat {pos}"),
    None => "no group".to_string(),
  };
  format!("{}  {:<24} {:<32} {:<5}  {seat}", p.id, p.full_name, p.email, p.role.to_string())
}

pub fn member_line(row: &MemberAssignment) -> String {
  let mark = if row.acknowledged { "✓" } else { " " };
  let m = row.mystery_id.mystery();
  format!(
    "[{mark}] {:>2}. {:<24} {:>2}. {}",
    row.profile.rose_pos.unwrap_or_default(),
    row.profile.full_name,
    m.id.get(),
    m.name,
  )
}

pub fn rotation_line(r: &Rotation) -> String {
  format!(
    "{}  generation {:>3}  by {}",
    r.recorded_at.format("%Y-%m-%d %H:%M"),
    r.generation,
    r.performed_by,
  )
}

pub fn intention(i: &Intention) -> String {
  format!("{}  {}\n\n{}", i.period, i.title, i.content)
}
