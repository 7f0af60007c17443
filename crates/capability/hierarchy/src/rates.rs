const DAY_MS: i64 = 86_400_000;

/// round(100 × part / total)，四舍五入，结果落在 0..=100；total 为 0 时返回 0。
pub fn occupancy_rate(part: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let part = u64::from(part.min(total));
    let total = u64::from(total);
    ((200 * part + total) / (2 * total)) as u8
}

/// 姓名首字母，如 `John`、`Smith` → `J.S.`。
pub fn patient_initials(first_name: &str, last_name: &str) -> String {
    let initials: String = [first_name, last_name]
        .iter()
        .filter_map(|name| name.trim().chars().next())
        .flat_map(|ch| ch.to_uppercase().chain(std::iter::once('.')))
        .collect();
    if initials.is_empty() {
        "?".to_string()
    } else {
        initials
    }
}

/// 自入院起的整天数，不为负。
pub fn length_of_stay_days(admitted_at_ms: i64, now_ms: i64) -> u32 {
    let elapsed = now_ms.saturating_sub(admitted_at_ms).max(0);
    u32::try_from(elapsed / DAY_MS).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_rounds_half_up() {
        assert_eq!(occupancy_rate(2, 3), 67);
        assert_eq!(occupancy_rate(1, 3), 33);
        assert_eq!(occupancy_rate(1, 2), 50);
        assert_eq!(occupancy_rate(1, 200), 1);
        assert_eq!(occupancy_rate(0, 0), 0);
        assert_eq!(occupancy_rate(5, 5), 100);
    }

    #[test]
    fn rate_never_exceeds_hundred() {
        assert_eq!(occupancy_rate(9, 4), 100);
        assert_eq!(occupancy_rate(u32::MAX, u32::MAX), 100);
    }

    #[test]
    fn initials_hide_full_name() {
        assert_eq!(patient_initials("john", "Smith"), "J.S.");
        assert_eq!(patient_initials("  ", "Öberg"), "Ö.");
        assert_eq!(patient_initials("", ""), "?");
    }

    #[test]
    fn stay_is_whole_days() {
        assert_eq!(length_of_stay_days(0, DAY_MS * 3 - 1), 2);
        assert_eq!(length_of_stay_days(DAY_MS, 0), 0);
    }
}
