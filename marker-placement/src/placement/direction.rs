use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Policy deriving the final rotation of a marker from the local direction of the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Always flipped to point against the path
    Left,
    /// Follows the path as is
    #[default]
    Right,
    /// Flipped like [`Direction::Left`], rejected if the result points away from the baseline
    LeftOnly,
    /// Like [`Direction::Right`], rejected if the path points away from the baseline
    RightOnly,
    /// Flipped whenever it would otherwise be upside-down
    Auto,
    /// Mirror of [`Direction::Auto`]: flipped whenever it would otherwise be upright
    AutoDown,
    /// Fixed at 0, regardless of the path
    Up,
    /// Fixed at π, regardless of the path
    Down,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Left,
        Direction::Right,
        Direction::LeftOnly,
        Direction::RightOnly,
        Direction::Auto,
        Direction::AutoDown,
        Direction::Up,
        Direction::Down,
    ];

    /// Resolves the raw path direction `angle` (radians) into the marker's rotation, normalized into (−π, π].
    ///
    /// Returns `None` if the policy rejects the candidate altogether, which only
    /// [`Direction::LeftOnly`] and [`Direction::RightOnly`] do.
    pub fn resolve(self, angle: f64) -> Option<f64> {
        let upright = |a: f64| normalize_angle(a).abs() < FRAC_PI_2;
        let resolved = match self {
            Direction::Up => 0.0,
            Direction::Down => PI,
            Direction::Auto => match normalize_angle(angle).abs() > FRAC_PI_2 {
                true => angle + PI,
                false => angle,
            },
            Direction::AutoDown => match upright(angle) {
                true => angle + PI,
                false => angle,
            },
            Direction::Left => angle + PI,
            Direction::Right => angle,
            Direction::LeftOnly => match upright(angle + PI) {
                true => angle + PI,
                false => return None,
            },
            Direction::RightOnly => match upright(angle) {
                true => angle,
                false => return None,
            },
        };
        Some(normalize_angle(resolved))
    }

    /// Whether this policy can reject candidates instead of only rotating them
    pub fn is_filter(self) -> bool {
        matches!(self, Direction::LeftOnly | Direction::RightOnly)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::LeftOnly => "left-only",
            Direction::RightOnly => "right-only",
            Direction::Auto => "auto",
            Direction::AutoDown => "auto-down",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Direction::ALL.into_iter().find(|d| d.as_str() == s) {
            Some(d) => Ok(d),
            None => bail!("unknown direction: {s:?}"),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps an arbitrary angle into (−π, π]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    match a > PI {
        true => a - TAU,
        false => a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::FPA;
    use test_case::test_case;

    fn assert_angle(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("candidate was rejected");
        assert!(
            FPA(actual) == FPA(expected),
            "resolved to {actual}, expected {expected}"
        );
    }

    #[test_case(0.0, 0.0; "zero")]
    #[test_case(PI, PI; "pi stays")]
    #[test_case(-PI, PI; "minus pi wraps")]
    #[test_case(1.6 * PI, -0.4 * PI; "beyond pi")]
    #[test_case(-2.5 * PI, -0.5 * PI; "large negative")]
    fn normalize(input: f64, expected: f64) {
        assert!(FPA(normalize_angle(input)) == FPA(expected));
    }

    #[test]
    fn non_filter_policies_always_accept() {
        let policies = Direction::ALL.into_iter().filter(|d| !d.is_filter());
        for d in policies {
            for i in -40..=40 {
                let angle = i as f64 * 0.1 * PI;
                let resolved = d.resolve(angle);
                assert!(resolved.is_some(), "{d} rejected {angle}");
                let r = resolved.unwrap();
                assert!(r > -PI && r <= PI, "{d} resolved {angle} to {r}");
            }
        }
    }

    #[test]
    fn fixed_policies() {
        assert_angle(Direction::Up.resolve(1.3), 0.0);
        assert_angle(Direction::Down.resolve(-0.7), PI);
    }

    #[test]
    fn right_only() {
        assert_angle(Direction::RightOnly.resolve(0.0), 0.0);
        assert_angle(Direction::RightOnly.resolve(0.3), 0.3);
        assert_eq!(Direction::RightOnly.resolve(PI), None);
        assert_eq!(Direction::RightOnly.resolve(0.75 * PI), None);
    }

    #[test]
    fn left_only() {
        assert_angle(Direction::LeftOnly.resolve(PI), 0.0);
        assert_eq!(Direction::LeftOnly.resolve(0.0), None);
        assert_eq!(Direction::LeftOnly.resolve(0.25 * PI), None);
    }

    #[test]
    fn left_and_right() {
        assert_angle(Direction::Left.resolve(0.25 * PI), -0.75 * PI);
        assert_angle(Direction::Right.resolve(0.25 * PI), 0.25 * PI);
    }

    #[test_case(0.6 * PI, -0.4 * PI; "flips beyond ninety degrees")]
    #[test_case(0.2 * PI, 0.2 * PI; "keeps upright")]
    #[test_case(-0.9 * PI, 0.1 * PI; "flips negative")]
    fn auto(input: f64, expected: f64) {
        assert_angle(Direction::Auto.resolve(input), expected);
    }

    #[test]
    fn auto_down_mirrors_auto() {
        for i in -19..=19 {
            let angle = i as f64 * 0.05 * PI + 0.01;
            let auto = Direction::Auto.resolve(angle).unwrap();
            let auto_down = Direction::AutoDown.resolve(angle).unwrap();
            let auto_flipped = FPA(auto) != FPA(normalize_angle(angle));
            let auto_down_flipped = FPA(auto_down) != FPA(normalize_angle(angle));
            assert_ne!(auto_flipped, auto_down_flipped, "angle {angle}");
        }
        assert_angle(Direction::AutoDown.resolve(0.2 * PI), -0.8 * PI);
        assert_angle(Direction::AutoDown.resolve(0.6 * PI), 0.6 * PI);
    }

    #[test]
    fn toolkit_names_round_trip() {
        for d in Direction::ALL {
            assert_eq!(d.as_str().parse::<Direction>().unwrap(), d);
        }
        assert!("sideways".parse::<Direction>().is_err());
        assert_eq!(
            serde_json::from_str::<Direction>("\"auto-down\"").unwrap(),
            Direction::AutoDown
        );
    }
}
