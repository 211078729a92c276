// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::totals::Totals;
use crate::types::score::MAX_GRADE_POINTS;

/// Future credit loads the projection table is computed over.
pub const CREDIT_BUCKETS: [u32; 6] = [10, 20, 30, 40, 50, 60];

/// The GPA needed on a future credit load to reach the target, or a marker
/// that no attainable grade gets there.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Requirement {
    Gpa(f64),
    Unattainable,
}

impl Requirement {
    pub fn as_gpa(self) -> Option<f64> {
        match self {
            Requirement::Gpa(gpa) => Some(gpa),
            Requirement::Unattainable => None,
        }
    }
}

/// Compute the GPA required on exactly `bucket` additional credits to raise
/// the cumulative GPA to `target`. With no credits earned yet the answer is
/// the target itself. Values above the maximum grade-point value are
/// unattainable; negative values clamp to zero (the target is already met).
pub fn required_for(bucket: u32, cumulative: &Totals, target: f64) -> Requirement {
    let required = if cumulative.total_credits == 0 {
        target
    } else {
        let total_credits = (cumulative.total_credits + bucket) as f64;
        (target * total_credits - cumulative.total_points) / bucket as f64
    };
    if required > MAX_GRADE_POINTS || target > MAX_GRADE_POINTS {
        Requirement::Unattainable
    } else {
        Requirement::Gpa(required.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(total_credits: u32, total_points: f64) -> Totals {
        let gpa = if total_credits > 0 {
            total_points / total_credits as f64
        } else {
            0.0
        };
        Totals {
            total_credits,
            total_points,
            gpa,
        }
    }

    #[test]
    fn test_no_credits_yet() {
        // With nothing saved, every bucket needs exactly the target.
        for bucket in CREDIT_BUCKETS {
            let requirement = required_for(bucket, &totals(0, 0.0), 4.0);
            assert_eq!(requirement, Requirement::Gpa(4.0));
        }
    }

    #[test]
    fn test_required_above_maximum() {
        // 30 credits at 3.0; reaching 4.0 over 10 more credits needs a 7.0.
        let requirement = required_for(10, &totals(30, 90.0), 4.0);
        assert_eq!(requirement, Requirement::Unattainable);
    }

    #[test]
    fn test_attainable_bucket() {
        // Same record over 60 more credits: (4.0 * 90 - 90) / 60 = 4.5,
        // still unattainable; at target 3.5: (3.5 * 90 - 90) / 60 = 3.5.
        assert_eq!(required_for(60, &totals(30, 90.0), 4.0), Requirement::Unattainable);
        let requirement = required_for(60, &totals(30, 90.0), 3.5);
        match requirement {
            Requirement::Gpa(gpa) => assert!((gpa - 3.5).abs() < 1e-9),
            Requirement::Unattainable => panic!("expected attainable"),
        }
    }

    #[test]
    fn test_target_already_met_clamps_to_zero() {
        // 30 credits at 4.0 with a 2.0 target: the raw requirement is
        // negative and clamps to zero.
        let requirement = required_for(10, &totals(30, 120.0), 2.0);
        assert_eq!(requirement, Requirement::Gpa(0.0));
    }

    #[test]
    fn test_target_above_maximum() {
        let requirement = required_for(10, &totals(0, 0.0), 4.4);
        assert_eq!(requirement, Requirement::Unattainable);
    }

    #[test]
    fn test_as_gpa() {
        assert_eq!(Requirement::Gpa(3.0).as_gpa(), Some(3.0));
        assert_eq!(Requirement::Unattainable.as_gpa(), None);
    }
}
