//! Iterator pipelines over in-memory collections: projection, filtering,
//! joins, grouping, ordering and aggregates.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::capitalised;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: u32,
    pub name: &'static str,
    pub email: &'static str,
    pub age: u32,
    pub department_id: u32,
    pub course_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: u32,
    pub title: &'static str,
    pub credits: u32,
    pub instructor: &'static str,
}

pub fn students() -> Vec<Student> {
    let student = |id, name, email, age, department_id, course_ids: &[u32]| Student {
        id,
        name,
        email,
        age,
        department_id,
        course_ids: course_ids.to_vec(),
    };
    vec![
        student(1, "Alice",   "alice@example.com",   20, 1, &[1, 2, 3]),
        student(2, "Bob",     "bob@example.com",     21, 1, &[1, 4]),
        student(3, "Charlie", "charlie@example.com", 19, 2, &[2, 3, 4]),
        student(4, "Diana",   "diana@example.com",   22, 2, &[4]),
    ]
}

pub fn courses() -> Vec<Course> {
    vec![
        Course { id: 1, title: "C# Fundamentals", credits: 3, instructor: "Dr. Smith" },
        Course { id: 2, title: "Web Development", credits: 4, instructor: "Dr. Jones" },
        Course { id: 3, title: "Database Design", credits: 3, instructor: "Dr. Brown" },
        Course { id: 4, title: "Cloud Computing", credits: 4, instructor: "Dr. Lee" },
    ]
}

pub fn names(students: &[Student]) -> Vec<&'static str> {
    students.iter().map(|s| s.name).collect()
}

/// `Name (age)` for students at least `min_age` old in `department_id`.
pub fn adults_in_department(students: &[Student], min_age: u32, department_id: u32) -> Vec<String> {
    students
        .iter()
        .filter(|s| s.age >= min_age && s.department_id == department_id)
        .map(|s| format!("{} ({})", s.name, s.age))
        .collect()
}

/// Inner join of every (student, course id) pair against the course list.
pub fn enrollments(students: &[Student], courses: &[Course]) -> Vec<String> {
    let by_id: HashMap<u32, &Course> = courses.iter().map(|c| (c.id, c)).collect();
    students
        .iter()
        .flat_map(|s| s.course_ids.iter().map(move |id| (s.name, *id)))
        .filter_map(|(name, id)| by_id.get(&id).map(|c| format!("{name} enrolled in {}", c.title)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentGroup {
    pub department_id: u32,
    pub students: Vec<&'static str>,
}

/// Groups students by department, ordered by department id.
pub fn by_department(students: &[Student]) -> Vec<DepartmentGroup> {
    let mut groups: BTreeMap<u32, Vec<&'static str>> = BTreeMap::new();
    for s in students {
        groups.entry(s.department_id).or_default().push(s.name);
    }
    groups
        .into_iter()
        .map(|(department_id, students)| DepartmentGroup { department_id, students })
        .collect()
}

/// Oldest first; ties broken by name.
pub fn by_age_desc_then_name(students: &[Student]) -> Vec<&Student> {
    let mut sorted: Vec<&Student> = students.iter().collect();
    sorted.sort_by(|a, b| b.age.cmp(&a.age).then_with(|| a.name.cmp(b.name)));
    sorted
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgeStats {
    pub average: f64,
    pub max: u32,
    pub min: u32,
    pub count: usize,
}

/// `None` for an empty slice.
pub fn age_stats(students: &[Student]) -> Option<AgeStats> {
    let max = students.iter().map(|s| s.age).max()?;
    let min = students.iter().map(|s| s.age).min()?;
    let total: u32 = students.iter().map(|s| s.age).sum();
    Some(AgeStats {
        average: f64::from(total) / students.len() as f64,
        max,
        min,
        count: students.len(),
    })
}

pub fn distinct_sorted(numbers: &[i32]) -> Vec<i32> {
    numbers.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

pub fn any_at_least(students: &[Student], age: u32) -> bool {
    students.iter().any(|s| s.age >= age)
}

pub fn all_at_least(students: &[Student], age: u32) -> bool {
    students.iter().all(|s| s.age >= age)
}

pub fn lines() -> Vec<String> {
    let students = students();
    let courses = courses();
    let mut out = vec!["Student Names:".to_owned()];
    out.extend(names(&students).into_iter().map(|n| format!("  - {n}")));

    out.push("Adults from Department 1:".to_owned());
    out.extend(adults_in_department(&students, 21, 1).into_iter().map(|s| format!("  - {s}")));

    out.push("Student-Course Enrollments:".to_owned());
    out.extend(enrollments(&students, &courses).into_iter().map(|e| format!("  - {e}")));

    out.push("Students by Department:".to_owned());
    for group in by_department(&students) {
        out.push(format!(
            "  Department {}: {} students - {}",
            group.department_id,
            group.students.len(),
            group.students.join(", "),
        ));
    }

    out.push("Students sorted by Age (desc) then Name:".to_owned());
    for s in by_age_desc_then_name(&students) {
        out.push(format!("  - {} - Age {}", s.name, s.age));
    }

    if let Some(stats) = age_stats(&students) {
        out.push("Student Age Statistics:".to_owned());
        out.push(format!("  Average Age: {:.2}", stats.average));
        out.push(format!("  Max Age: {}", stats.max));
        out.push(format!("  Min Age: {}", stats.min));
        out.push(format!("  Total Students: {}", stats.count));
    }

    let unique = distinct_sorted(&[1, 2, 2, 3, 3, 3, 4, 4, 4, 4]);
    out.push("Unique Numbers:".to_owned());
    out.push(format!(
        "  {}",
        unique.iter().map(i32::to_string).collect::<Vec<_>>().join(", ")
    ));

    out.push("Conditional Checks:".to_owned());
    out.push(format!("  Has students 21+: {}", capitalised(any_at_least(&students, 21))));
    out.push(format!("  All students 18+: {}", capitalised(all_at_least(&students, 18))));
    out
}
