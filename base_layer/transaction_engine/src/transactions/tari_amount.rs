//  Copyright 2022. The Tari Project
//
//  Redistribution and use in source and binary forms, with or without modification, are permitted provided that the
//  following conditions are met:
//
//  1. Redistributions of source code must retain the above copyright notice, this list of conditions and the following
//  disclaimer.
//
//  2. Redistributions in binary form must reproduce the above copyright notice, this list of conditions and the
//  following disclaimer in the documentation and/or other materials provided with the distribution.
//
//  3. Neither the name of the copyright holder nor the names of its contributors may be used to endorse or promote
//  products derived from this software without specific prior written permission.
//
//  THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES,
//  INCLUDING, BUT NOT LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
//  DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
//  SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
//  SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY,
//  WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE
//  USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use std::{
    fmt::{Display, Error, Formatter},
    iter::Sum,
    ops::{Add, Mul},
};

use newtype_ops::newtype_ops;
use serde::{Deserialize, Serialize};

use crate::types::PrivateKey;

/// All calculations using Minotari amounts should use these newtypes to prevent bugs related to rounding errors, unit
/// conversion errors etc.
///
/// ```edition2021
/// use tari_transaction_engine::transactions::tari_amount::MicroMinotari;
///
/// let a = MicroMinotari::from(500);
/// let b = MicroMinotari::from(50);
/// assert_eq!(a + b, MicroMinotari::from(550));
/// ```
#[derive(Copy, Default, Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MicroMinotari(pub u64);

/// A convenience constant that makes it easier to define Minotari amounts.
/// ```edition2021
///   use tari_transaction_engine::transactions::tari_amount::{uT, MicroMinotari, T};
///   assert_eq!(MicroMinotari::from(42), 42 * uT);
///   assert_eq!(1 * T, 1_000_000.into());
/// ```
#[allow(non_upper_case_globals)]
pub const uT: MicroMinotari = MicroMinotari(1);
pub const T: MicroMinotari = MicroMinotari(1_000_000);

// You can only add or subtract µT from µT
newtype_ops! { [MicroMinotari] {add sub} {:=} Self Self }
newtype_ops! { [MicroMinotari] {add sub} {:=} &Self &Self }
newtype_ops! { [MicroMinotari] {add sub} {:=} Self &Self }

// Multiplication and division only makes sense when µT is multiplied/divided by a scalar
newtype_ops! { [MicroMinotari] {mul div rem} {:=} Self u64 }

impl Mul<MicroMinotari> for u64 {
    type Output = MicroMinotari;

    fn mul(self, rhs: MicroMinotari) -> Self::Output {
        MicroMinotari(self * rhs.0)
    }
}

impl MicroMinotari {
    pub const fn zero() -> Self {
        MicroMinotari(0)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn checked_add(self, v: MicroMinotari) -> Option<MicroMinotari> {
        self.0.checked_add(v.0).map(MicroMinotari)
    }

    pub fn checked_sub(self, v: MicroMinotari) -> Option<MicroMinotari> {
        self.0.checked_sub(v.0).map(MicroMinotari)
    }
}

impl Display for MicroMinotari {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{} µT", self.0)
    }
}

impl From<MicroMinotari> for u64 {
    fn from(v: MicroMinotari) -> Self {
        v.0
    }
}

impl From<u64> for MicroMinotari {
    fn from(v: u64) -> Self {
        MicroMinotari(v)
    }
}

impl From<MicroMinotari> for PrivateKey {
    fn from(v: MicroMinotari) -> Self {
        v.0.into()
    }
}

impl<'a> Sum<&'a MicroMinotari> for MicroMinotari {
    fn sum<I: Iterator<Item = &'a MicroMinotari>>(iter: I) -> MicroMinotari {
        iter.fold(MicroMinotari::from(0), Add::add)
    }
}

impl Sum<MicroMinotari> for MicroMinotari {
    fn sum<I: Iterator<Item = MicroMinotari>>(iter: I) -> MicroMinotari {
        iter.fold(MicroMinotari::from(0), Add::add)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn micro_minotari_arithmetic() {
        let mut a = MicroMinotari::from(500);
        let b = MicroMinotari::from(50);
        assert_eq!(a + b, MicroMinotari::from(550));
        assert_eq!(a - b, MicroMinotari::from(450));
        assert_eq!(a * 5, MicroMinotari::from(2_500));
        assert_eq!(a / 5, MicroMinotari::from(100));
        a += b;
        assert_eq!(a, MicroMinotari::from(550));
        assert_eq!(u64::from(a), 550);
        assert_eq!([a, b].iter().sum::<MicroMinotari>(), MicroMinotari::from(600));
    }

    #[test]
    fn checked_arithmetic() {
        assert_eq!(MicroMinotari(1).checked_sub(MicroMinotari(2)), None);
        assert_eq!(MicroMinotari(u64::MAX).checked_add(MicroMinotari(1)), None);
        assert_eq!(MicroMinotari(3).checked_sub(MicroMinotari(2)), Some(MicroMinotari(1)));
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", 1050 * uT), "1050 µT");
    }
}
