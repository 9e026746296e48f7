//! Forward-mode differentiation of right-hand sides.
//!
//! A model written generically over [`Scalar`](crate::traits::Scalar) can be
//! evaluated on [`Dual`] numbers; seeding one coordinate with a unit tangent
//! yields one column of the Jacobian per evaluation.

use crate::traits::{
    MappingAutonomousEndogenous, MappingAutonomousExogenous, MappingNonAutonomousEndogenous,
};
use nalgebra::{SMatrix, SVector};
use num_traits::{Float, FromPrimitive, Num, NumCast, One, ToPrimitive, Zero};
use std::num::FpCategory;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};

/// Simple Dual Number for Forward Mode AD
/// val: real part
/// eps: infinitesimal part
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Dual {
    pub val: f64,
    pub eps: f64,
}

impl Dual {
    pub fn new(val: f64, eps: f64) -> Self {
        Self { val, eps }
    }

    /// A value that does not vary with the differentiation direction.
    pub fn constant(val: f64) -> Self {
        Self::new(val, 0.0)
    }

    /// The differentiation variable itself, `d/dv v = 1`.
    pub fn variable(val: f64) -> Self {
        Self::new(val, 1.0)
    }

    /// Applies a scalar function with known derivative `df` at `self.val`.
    ///
    /// A value with no tangent keeps none, even where `df` is infinite.
    #[inline]
    fn chain(self, f: f64, df: f64) -> Self {
        if self.eps == 0.0 {
            return Self::constant(f);
        }
        Self::new(f, df * self.eps)
    }
}

impl From<f64> for Dual {
    fn from(val: f64) -> Self {
        Self::constant(val)
    }
}

impl Zero for Dual {
    fn zero() -> Self {
        Self::constant(0.0)
    }
    fn is_zero(&self) -> bool {
        self.val == 0.0 && self.eps == 0.0
    }
}

impl One for Dual {
    fn one() -> Self {
        Self::constant(1.0)
    }
}

impl Add for Dual {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.val + rhs.val, self.eps + rhs.eps)
    }
}

impl Sub for Dual {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.val - rhs.val, self.eps - rhs.eps)
    }
}

impl Mul for Dual {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.val * rhs.val, self.val * rhs.eps + self.eps * rhs.val)
    }
}

impl Div for Dual {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self::new(
            self.val / rhs.val,
            (self.eps * rhs.val - self.val * rhs.eps) / (rhs.val * rhs.val),
        )
    }
}

impl Neg for Dual {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.val, -self.eps)
    }
}

impl Rem for Dual {
    type Output = Self;
    // a % b = a - b * trunc(a / b), with trunc locally constant.
    fn rem(self, rhs: Self) -> Self {
        let quotient = (self.val / rhs.val).trunc();
        Self::new(self.val % rhs.val, self.eps - rhs.eps * quotient)
    }
}

macro_rules! assign_from_binary {
    ($($trait:ident :: $method:ident => $op:tt),* $(,)?) => {
        $(
            impl $trait for Dual {
                fn $method(&mut self, rhs: Self) {
                    *self = *self $op rhs;
                }
            }
        )*
    };
}

assign_from_binary! {
    AddAssign::add_assign => +,
    SubAssign::sub_assign => -,
    MulAssign::mul_assign => *,
    DivAssign::div_assign => /,
    RemAssign::rem_assign => %,
}

impl Num for Dual {
    type FromStrRadixErr = <f64 as Num>::FromStrRadixErr;
    fn from_str_radix(str: &str, radix: u32) -> Result<Self, Self::FromStrRadixErr> {
        f64::from_str_radix(str, radix).map(Self::constant)
    }
}

impl ToPrimitive for Dual {
    fn to_i64(&self) -> Option<i64> {
        self.val.to_i64()
    }
    fn to_u64(&self) -> Option<u64> {
        self.val.to_u64()
    }
    fn to_f64(&self) -> Option<f64> {
        Some(self.val)
    }
}

impl FromPrimitive for Dual {
    fn from_i64(n: i64) -> Option<Self> {
        Some(Self::constant(n as f64))
    }
    fn from_u64(n: u64) -> Option<Self> {
        Some(Self::constant(n as f64))
    }
    fn from_f64(n: f64) -> Option<Self> {
        Some(Self::constant(n))
    }
}

impl NumCast for Dual {
    fn from<T: ToPrimitive>(n: T) -> Option<Self> {
        n.to_f64().map(Self::constant)
    }
}

impl Float for Dual {
    fn nan() -> Self {
        Self::constant(f64::NAN)
    }
    fn infinity() -> Self {
        Self::constant(f64::INFINITY)
    }
    fn neg_infinity() -> Self {
        Self::constant(f64::NEG_INFINITY)
    }
    fn neg_zero() -> Self {
        Self::constant(-0.0)
    }
    fn min_value() -> Self {
        Self::constant(f64::MIN)
    }
    fn min_positive_value() -> Self {
        Self::constant(f64::MIN_POSITIVE)
    }
    fn max_value() -> Self {
        Self::constant(f64::MAX)
    }
    fn is_nan(self) -> bool {
        self.val.is_nan()
    }
    fn is_infinite(self) -> bool {
        self.val.is_infinite()
    }
    fn is_finite(self) -> bool {
        self.val.is_finite()
    }
    fn is_normal(self) -> bool {
        self.val.is_normal()
    }
    fn classify(self) -> FpCategory {
        self.val.classify()
    }

    // Piecewise constant functions have zero derivative almost everywhere.
    fn floor(self) -> Self {
        Self::constant(self.val.floor())
    }
    fn ceil(self) -> Self {
        Self::constant(self.val.ceil())
    }
    fn round(self) -> Self {
        Self::constant(self.val.round())
    }
    fn trunc(self) -> Self {
        Self::constant(self.val.trunc())
    }
    fn fract(self) -> Self {
        Self::new(self.val.fract(), self.eps)
    }
    fn abs(self) -> Self {
        if self.val.is_sign_negative() {
            -self
        } else {
            self
        }
    }
    fn signum(self) -> Self {
        Self::constant(self.val.signum())
    }
    fn is_sign_positive(self) -> bool {
        self.val.is_sign_positive()
    }
    fn is_sign_negative(self) -> bool {
        self.val.is_sign_negative()
    }
    fn mul_add(self, a: Self, b: Self) -> Self {
        self * a + b
    }
    fn recip(self) -> Self {
        Self::one() / self
    }

    fn powi(self, n: i32) -> Self {
        if n == 0 {
            return Self::one();
        }
        self.chain(self.val.powi(n), n as f64 * self.val.powi(n - 1))
    }
    fn powf(self, n: Self) -> Self {
        let value = self.val.powf(n.val);
        let mut eps = 0.0;
        if self.eps != 0.0 {
            eps += n.val * self.val.powf(n.val - 1.0) * self.eps;
        }
        // The exponent term only exists when the exponent itself varies.
        if n.eps != 0.0 {
            eps += value * self.val.ln() * n.eps;
        }
        Self::new(value, eps)
    }
    fn sqrt(self) -> Self {
        let s = self.val.sqrt();
        self.chain(s, 0.5 / s)
    }
    fn cbrt(self) -> Self {
        let c = self.val.cbrt();
        self.chain(c, 1.0 / (3.0 * c * c))
    }
    fn hypot(self, other: Self) -> Self {
        let h = self.val.hypot(other.val);
        Self::new(h, (self.val * self.eps + other.val * other.eps) / h)
    }

    fn exp(self) -> Self {
        let e = self.val.exp();
        self.chain(e, e)
    }
    fn exp2(self) -> Self {
        let e = self.val.exp2();
        self.chain(e, e * std::f64::consts::LN_2)
    }
    fn exp_m1(self) -> Self {
        self.chain(self.val.exp_m1(), self.val.exp())
    }
    fn ln(self) -> Self {
        self.chain(self.val.ln(), 1.0 / self.val)
    }
    fn log(self, base: Self) -> Self {
        self.ln() / base.ln()
    }
    fn log2(self) -> Self {
        self.chain(self.val.log2(), 1.0 / (self.val * std::f64::consts::LN_2))
    }
    fn log10(self) -> Self {
        self.chain(self.val.log10(), 1.0 / (self.val * std::f64::consts::LN_10))
    }
    fn ln_1p(self) -> Self {
        self.chain(self.val.ln_1p(), 1.0 / (1.0 + self.val))
    }

    fn max(self, other: Self) -> Self {
        if self.val >= other.val {
            self
        } else {
            other
        }
    }
    fn min(self, other: Self) -> Self {
        if self.val <= other.val {
            self
        } else {
            other
        }
    }
    fn abs_sub(self, other: Self) -> Self {
        if self.val > other.val {
            self - other
        } else {
            Self::zero()
        }
    }

    fn sin(self) -> Self {
        self.chain(self.val.sin(), self.val.cos())
    }
    fn cos(self) -> Self {
        self.chain(self.val.cos(), -self.val.sin())
    }
    fn tan(self) -> Self {
        let t = self.val.tan();
        self.chain(t, 1.0 + t * t)
    }
    fn sin_cos(self) -> (Self, Self) {
        (self.sin(), self.cos())
    }
    fn asin(self) -> Self {
        self.chain(self.val.asin(), 1.0 / (1.0 - self.val * self.val).sqrt())
    }
    fn acos(self) -> Self {
        self.chain(self.val.acos(), -1.0 / (1.0 - self.val * self.val).sqrt())
    }
    fn atan(self) -> Self {
        self.chain(self.val.atan(), 1.0 / (1.0 + self.val * self.val))
    }
    fn atan2(self, other: Self) -> Self {
        let (y, x) = (self.val, other.val);
        Self::new(
            y.atan2(x),
            (x * self.eps - y * other.eps) / (x * x + y * y),
        )
    }

    fn sinh(self) -> Self {
        self.chain(self.val.sinh(), self.val.cosh())
    }
    fn cosh(self) -> Self {
        self.chain(self.val.cosh(), self.val.sinh())
    }
    fn tanh(self) -> Self {
        let t = self.val.tanh();
        self.chain(t, 1.0 - t * t)
    }
    fn asinh(self) -> Self {
        self.chain(self.val.asinh(), 1.0 / (self.val * self.val + 1.0).sqrt())
    }
    fn acosh(self) -> Self {
        self.chain(self.val.acosh(), 1.0 / (self.val * self.val - 1.0).sqrt())
    }
    fn atanh(self) -> Self {
        self.chain(self.val.atanh(), 1.0 / (1.0 - self.val * self.val))
    }

    fn integer_decode(self) -> (u64, i16, i8) {
        self.val.integer_decode()
    }
}

/// `x` as duals with a unit tangent on coordinate `seed` (none if out of range).
fn seeded<const N: usize>(x: &[f64; N], seed: usize) -> [Dual; N] {
    std::array::from_fn(|i| Dual::new(x[i], if i == seed { 1.0 } else { 0.0 }))
}

fn constants<const N: usize>(x: &[f64; N]) -> [Dual; N] {
    std::array::from_fn(|i| Dual::constant(x[i]))
}

/// `∂f/∂x` of an autonomous, endogenous model at `x`.
pub fn state_jacobian<S, const N: usize>(model: &S, x: &[f64; N]) -> SMatrix<f64, N, N>
where
    S: MappingAutonomousEndogenous<Dual, N> + ?Sized,
{
    let mut jacobian = SMatrix::<f64, N, N>::zeros();
    let mut out = [Dual::zero(); N];
    for j in 0..N {
        model.compute_rhs(&seeded(x, j), &mut out);
        for i in 0..N {
            jacobian[(i, j)] = out[i].eps;
        }
    }
    jacobian
}

/// `∂f/∂x` of a non-autonomous, endogenous model at `(ti, x)`.
///
/// Models whose independent variable is the state scalar take `ti` as a
/// `Dual`; pass `Dual::constant(t)` so time carries no tangent.
pub fn nonautonomous_state_jacobian<I, S, const N: usize>(
    model: &S,
    ti: I,
    x: &[f64; N],
) -> SMatrix<f64, N, N>
where
    I: Copy,
    S: MappingNonAutonomousEndogenous<I, Dual, N> + ?Sized,
{
    let mut jacobian = SMatrix::<f64, N, N>::zeros();
    let mut out = [Dual::zero(); N];
    for j in 0..N {
        model.compute_rhs(ti, &seeded(x, j), &mut out);
        for i in 0..N {
            jacobian[(i, j)] = out[i].eps;
        }
    }
    jacobian
}

/// `∂f/∂t` of a non-autonomous, endogenous model on continuous time.
pub fn time_partial<S, const N: usize>(model: &S, t: f64, x: &[f64; N]) -> SVector<f64, N>
where
    S: MappingNonAutonomousEndogenous<Dual, Dual, N> + ?Sized,
{
    let mut out = [Dual::zero(); N];
    model.compute_rhs(Dual::variable(t), &constants(x), &mut out);
    SVector::<f64, N>::from_fn(|i, _| out[i].eps)
}

/// Linearisation `(A, B) = (∂f/∂x, ∂f/∂u)` of an autonomous, exogenous model
/// about `(x, u)`.
pub fn exogenous_jacobians<S, const N: usize, const M: usize>(
    model: &S,
    x: &[f64; N],
    u: &[f64; M],
) -> (SMatrix<f64, N, N>, SMatrix<f64, N, M>)
where
    S: MappingAutonomousExogenous<Dual, N, M> + ?Sized,
{
    let mut a = SMatrix::<f64, N, N>::zeros();
    let mut b = SMatrix::<f64, N, M>::zeros();
    let mut out = [Dual::zero(); N];

    let fixed_u = constants(u);
    for j in 0..N {
        model.compute_rhs(&seeded(x, j), &fixed_u, &mut out);
        for i in 0..N {
            a[(i, j)] = out[i].eps;
        }
    }

    let fixed_x = constants(x);
    for j in 0..M {
        model.compute_rhs(&fixed_x, &seeded(u, j), &mut out);
        for i in 0..N {
            b[(i, j)] = out[i].eps;
        }
    }

    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DrivenPendulum, Henon, KickedRotor, Pendulum, PendulumWithTorque};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    fn derivative(f: impl Fn(Dual) -> Dual, at: f64) -> f64 {
        f(Dual::variable(at)).eps
    }

    #[test]
    fn product_and_quotient_rules() {
        assert_close(derivative(|x| x * x * x, 2.0), 12.0);
        assert_close(derivative(|x| Dual::one() / x, 2.0), -0.25);
        assert_close(derivative(|x| x % Dual::constant(3.0), 7.5), 1.0);
    }

    #[test]
    fn elementary_function_derivatives() {
        let x = 0.3;
        assert_close(derivative(Float::sin, x), x.cos());
        assert_close(derivative(Float::cos, x), -x.sin());
        assert_close(derivative(Float::tan, x), 1.0 / (x.cos() * x.cos()));
        assert_close(derivative(Float::exp, x), x.exp());
        assert_close(derivative(Float::exp2, x), x.exp2() * 2.0f64.ln());
        assert_close(derivative(Float::exp_m1, x), x.exp());
        assert_close(derivative(Float::ln, x), 1.0 / x);
        assert_close(derivative(Float::ln_1p, x), 1.0 / (1.0 + x));
        assert_close(derivative(Float::log2, x), 1.0 / (x * 2.0f64.ln()));
        assert_close(derivative(Float::log10, x), 1.0 / (x * 10.0f64.ln()));
        assert_close(derivative(Float::sqrt, x), 0.5 / x.sqrt());
        assert_close(derivative(Float::cbrt, 8.0), 1.0 / 12.0);
        assert_close(derivative(Float::asin, x), 1.0 / (1.0 - x * x).sqrt());
        assert_close(derivative(Float::acos, x), -1.0 / (1.0 - x * x).sqrt());
        assert_close(derivative(Float::atan, x), 1.0 / (1.0 + x * x));
        assert_close(derivative(Float::sinh, x), x.cosh());
        assert_close(derivative(Float::cosh, x), x.sinh());
        assert_close(derivative(Float::tanh, x), 1.0 - x.tanh().powi(2));
        assert_close(derivative(Float::asinh, x), 1.0 / (x * x + 1.0).sqrt());
        assert_close(derivative(Float::acosh, 2.0), 1.0 / 3.0f64.sqrt());
        assert_close(derivative(Float::atanh, x), 1.0 / (1.0 - x * x));
    }

    #[test]
    fn power_derivatives() {
        assert_close(derivative(|x| x.powi(3), 2.0), 12.0);
        assert_close(derivative(|x| x.powf(Dual::constant(2.5)), 4.0), 20.0);
        // Constant exponent on a negative base must not pick up ln(x).
        assert_close(derivative(|x| x.powf(Dual::constant(2.0)), -3.0), -6.0);
        // d/dy 2^y = 2^y ln 2
        let y = Dual::variable(3.0);
        assert_close(Dual::constant(2.0).powf(y).eps, 8.0 * 2.0f64.ln());
    }

    #[test]
    fn zero_tangent_survives_singular_derivatives() {
        let zero = Dual::constant(0.0);
        assert_eq!(zero.sqrt().eps, 0.0);
        assert_eq!(zero.ln().eps, 0.0);
        assert_eq!(zero.cbrt().eps, 0.0);
        assert_eq!(Dual::constant(1.0).asin().eps, 0.0);
        assert_eq!(Dual::constant(-1.0).acos().eps, 0.0);
        assert_eq!(zero.powf(Dual::constant(0.5)).eps, 0.0);
    }

    #[test]
    fn zeroth_power_is_constant() {
        let x = Dual::variable(0.0).powi(0);
        assert_eq!(x.val, 1.0);
        assert_eq!(x.eps, 0.0);
        assert_eq!(Dual::variable(3.0).powi(0).eps, 0.0);
    }

    /// `[sqrt(x0) + x1, x1]`, singular in x0 at the origin.
    struct RootPlusLinear;

    impl<T: crate::traits::Scalar> MappingAutonomousEndogenous<T, 2> for RootPlusLinear {
        fn compute_rhs(&self, x: &[T; 2], rhs: &mut [T; 2]) {
            rhs[0] = x[0].sqrt() + x[1];
            rhs[1] = x[1];
        }
    }

    #[test]
    fn singular_column_does_not_spoil_the_others() {
        let j = state_jacobian(&RootPlusLinear, &[0.0, 1.0]);
        assert!(j[(0, 0)].is_infinite());
        assert_eq!(j[(0, 1)], 1.0);
        assert_eq!(j[(1, 0)], 0.0);
        assert_eq!(j[(1, 1)], 1.0);
    }

    #[test]
    fn two_argument_derivatives() {
        let x = Dual::variable(3.0);
        let four = Dual::constant(4.0);
        assert_close(x.hypot(four).eps, 0.6);
        assert_close(four.atan2(x).eps, -4.0 / 25.0);
        assert_close(x.max(four).eps, 0.0);
        assert_close(x.min(four).eps, 1.0);
        assert_close(x.abs_sub(four).eps, 0.0);
        assert_close((-x).abs().eps, 1.0);
    }

    #[test]
    fn pendulum_state_jacobian() {
        let pendulum = Pendulum::new(1.0, 1.0);
        let j = state_jacobian(&pendulum, &[0.0, 0.0]);
        assert_close(j[(0, 0)], 0.0);
        assert_close(j[(0, 1)], 1.0);
        assert_close(j[(1, 0)], -1.0);
        assert_close(j[(1, 1)], 0.0);

        let j = state_jacobian(&pendulum, &[FRAC_PI_2, 0.0]);
        assert!(j[(1, 0)].abs() < 1e-15);
    }

    #[test]
    fn henon_state_jacobian_matches_closed_form() {
        let henon = Henon::default();
        let x = [0.4, -0.1];
        let j = state_jacobian(&henon, &x);
        assert_close(j[(0, 0)], -2.0 * 1.4 * 0.4);
        assert_close(j[(0, 1)], 1.0);
        assert_close(j[(1, 0)], 0.3);
        assert_close(j[(1, 1)], 0.0);
        // The Hénon map contracts area by |det| = b everywhere.
        assert_close(j.determinant().abs(), 0.3);
    }

    #[test]
    fn torque_pendulum_linearisation() {
        let model = PendulumWithTorque::new(2.0, 9.81, 0.5);
        let (a, b) = exogenous_jacobians(&model, &[0.0, 0.0], &[0.0]);
        assert_close(a[(0, 1)], 1.0);
        assert_close(a[(1, 0)], -9.81 / 2.0);
        assert_close(b[(0, 0)], 0.0);
        assert_close(b[(1, 0)], 1.0 / (0.5 * 4.0));
    }

    #[test]
    fn driven_pendulum_time_and_state_partials() {
        let model = DrivenPendulum::new(1.0, 1.0, 0.5, 2.0);
        let t = PI / 4.0;
        let dt = time_partial(&model, t, &[0.0, 0.0]);
        assert_close(dt[0], 0.0);
        assert_close(dt[1], -0.5 * 2.0 * (2.0 * t).sin());

        let j = nonautonomous_state_jacobian(&model, Dual::constant(t), &[0.0, 0.0]);
        assert_close(j[(1, 0)], -1.0);
        assert_close(j[(0, 1)], 1.0);
    }

    #[test]
    fn discrete_index_jacobian_depends_on_the_step() {
        let rotor = KickedRotor::new(0.5, 2);
        let kicked = nonautonomous_state_jacobian(&rotor, 0usize, &[0.0, 0.0]);
        assert_close(kicked[(1, 0)], 0.5);
        assert_close(kicked[(0, 0)], 1.5);
        let free = nonautonomous_state_jacobian(&rotor, 1usize, &[0.0, 0.0]);
        assert_close(free[(1, 0)], 0.0);
        assert_close(free[(0, 0)], 1.0);
        assert_close(free[(0, 1)], 1.0);
    }
}
