//! 演示用的确定性扰动与模拟故障（不使用随机数）。

use domain::{BedRecord, BedStatus, VariationIntensity};

/// 开启模拟故障时，每隔多少个周期失败一次。
pub const SIMULATED_ERROR_EVERY: u64 = 10;

pub fn should_fail(cycle: u64) -> bool {
    cycle > 0 && cycle % SIMULATED_ERROR_EVERY == 0
}

/// 每隔多少张床位扰动一次。
pub fn variation_stride(intensity: VariationIntensity) -> usize {
    match intensity {
        VariationIntensity::Low => 20,
        VariationIntensity::Medium => 10,
        VariationIntensity::High => 5,
    }
}

/// 在空闲与预留之间翻转部分床位，起点随周期移动；返回翻转的数量。
///
/// 只触碰 Available/Reserved，占用床位与患者关联保持一致。
pub fn apply_variations(
    beds: &mut [BedRecord],
    intensity: VariationIntensity,
    cycle: u64,
) -> usize {
    let stride = variation_stride(intensity);
    let offset = (cycle % stride as u64) as usize;
    let mut changed = 0;
    for bed in beds.iter_mut().skip(offset).step_by(stride) {
        let flipped = match bed.status {
            Some(BedStatus::Available) => BedStatus::Reserved,
            Some(BedStatus::Reserved) => BedStatus::Available,
            _ => continue,
        };
        bed.status = Some(flipped);
        changed += 1;
    }
    changed
}
