//! Branches, matches and loops.

pub fn life_stage(age: u32) -> &'static str {
    if age >= 18 { "You are an adult" } else { "You are a minor" }
}

pub fn grade(score: u32) -> char {
    if score >= 90 {
        'A'
    } else if score >= 80 {
        'B'
    } else if score >= 70 {
        'C'
    } else {
        'F'
    }
}

pub fn age_group(age: u32) -> &'static str {
    match age {
        0..=12 => "Child",
        13..=17 => "Teen",
        _ => "Adult",
    }
}

pub fn day_name(day: u8) -> &'static str {
    match day {
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        _ => "Weekend",
    }
}

/// `(row,col) ` cells, one string per row.
pub fn grid(size: u32) -> Vec<String> {
    (1..=size)
        .map(|row| (1..=size).map(|col| format!("({row},{col}) ")).collect())
        .collect()
}

/// Counts from zero, skipping 3 and stopping at 7.
pub fn skip_three_stop_at_seven() -> Vec<u32> {
    let mut seen = Vec::new();
    for i in 0..10 {
        if i == 3 {
            continue;
        }
        if i == 7 {
            break;
        }
        seen.push(i);
    }
    seen
}

pub fn times_table(n: u32) -> Vec<String> {
    (1..=10).map(|i| format!("{n} × {i} = {}", n * i)).collect()
}

pub fn lines() -> Vec<String> {
    let age = 25;
    let mut out = vec![
        "=== IF Statements ===".to_owned(),
        life_stage(age).to_owned(),
        format!("Grade: {}", grade(85)),
        format!("Age Group: {}", age_group(age)),
        "=== Switch Statement ===".to_owned(),
        format!("Day: {}", day_name(3)),
        "=== For Loop ===".to_owned(),
    ];
    for i in 1..=5 {
        out.push(format!("Count: {i}"));
    }

    out.push("=== While Loop ===".to_owned());
    let mut counter = 0;
    while counter < 3 {
        out.push(format!("Loop: {counter}"));
        counter += 1;
    }

    // The body runs before the condition is checked.
    out.push("=== Do-While Loop ===".to_owned());
    let mut num = 0;
    loop {
        out.push(format!("Do-While: {num}"));
        num += 1;
        if num >= 3 {
            break;
        }
    }

    out.push("=== Foreach Loop ===".to_owned());
    for number in [10, 20, 30, 40, 50] {
        out.push(format!("Number: {number}"));
    }

    out.push("=== Nested Loops ===".to_owned());
    out.extend(grid(3));

    out.push("=== Break and Continue ===".to_owned());
    out.push(
        skip_three_stop_at_seven()
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(" "),
    );

    out.push("=== Times Table ===".to_owned());
    out.extend(times_table(5));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_ladder() {
        assert_eq!(grade(95), 'A');
        assert_eq!(grade(85), 'B');
        assert_eq!(grade(70), 'C');
        assert_eq!(grade(10), 'F');
    }

    #[test]
    fn age_groups() {
        assert_eq!(age_group(5), "Child");
        assert_eq!(age_group(13), "Teen");
        assert_eq!(age_group(25), "Adult");
        assert_eq!(life_stage(17), "You are a minor");
    }

    #[test]
    fn break_and_continue() {
        assert_eq!(skip_three_stop_at_seven(), vec![0, 1, 2, 4, 5, 6]);
    }

    #[test]
    fn nested_grid_and_table() {
        assert_eq!(grid(2), vec!["(1,1) (1,2) ", "(2,1) (2,2) "]);
        assert_eq!(times_table(5)[9], "5 × 10 = 50");
        assert_eq!(day_name(6), "Weekend");
    }
}
