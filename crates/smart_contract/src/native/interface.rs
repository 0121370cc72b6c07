//! Closed set of native-contract interface declarations.
//!
//! Both the compiler and the runtime read these tables: the compiler to
//! recognize native call sites and build tokens, the runtime to describe the
//! in-process contracts that service `CALLT`.

use neo_core::{ContractParameterType as T, UInt160};
use neo_vm::CallFlags;

/// Declared signature of one native method overload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: &'static str,
    pub parameters: &'static [T],
    pub return_type: T,
    /// Flags the callee needs in its effective set.
    pub required_flags: CallFlags,
    /// Safe methods never write state or notify.
    pub safe: bool,
    /// Base CPU fee, scaled by the execution fee factor when charged.
    pub cpu_fee: i64,
}

impl MethodSignature {
    const fn safe(name: &'static str, parameters: &'static [T], return_type: T, required_flags: CallFlags, cpu_fee: i64) -> Self {
        Self {
            name,
            parameters,
            return_type,
            required_flags,
            safe: true,
            cpu_fee,
        }
    }

    const fn unsafe_method(name: &'static str, parameters: &'static [T], return_type: T, required_flags: CallFlags, cpu_fee: i64) -> Self {
        Self {
            name,
            parameters,
            return_type,
            required_flags,
            safe: false,
            cpu_fee,
        }
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn has_return_value(&self) -> bool {
        self.return_type != T::Void
    }

    /// Flags a freshly built token carries unless the call site overrides them.
    pub fn default_token_flags(&self) -> CallFlags {
        if self.safe {
            CallFlags::READ_ONLY
        } else {
            CallFlags::ALL
        }
    }
}

const RS: CallFlags = CallFlags::READ_STATES;
const NONE: CallFlags = CallFlags::NONE;
const STATES: CallFlags = CallFlags::STATES;
const STATES_NOTIFY: CallFlags = CallFlags::STATES.union(CallFlags::ALLOW_NOTIFY);
const ALL: CallFlags = CallFlags::ALL;

const CONTRACT_MANAGEMENT: &[MethodSignature] = &[
    MethodSignature::safe("getMinimumDeploymentFee", &[], T::Integer, RS, 1 << 15),
    MethodSignature::unsafe_method("setMinimumDeploymentFee", &[T::Integer], T::Void, STATES, 1 << 15),
    MethodSignature::safe("getContract", &[T::Hash160], T::Array, RS, 1 << 15),
    MethodSignature::safe("getContractById", &[T::Integer], T::Array, RS, 1 << 15),
    MethodSignature::safe("getContractHashes", &[], T::InteropInterface, RS, 1 << 15),
    MethodSignature::safe("hasMethod", &[T::Hash160, T::String, T::Integer], T::Boolean, RS, 1 << 15),
    MethodSignature::unsafe_method("deploy", &[T::ByteArray, T::ByteArray], T::Array, STATES_NOTIFY, 0),
    MethodSignature::unsafe_method("deploy", &[T::ByteArray, T::ByteArray, T::Any], T::Array, STATES_NOTIFY, 0),
    MethodSignature::unsafe_method("update", &[T::ByteArray, T::ByteArray], T::Void, STATES_NOTIFY, 0),
    MethodSignature::unsafe_method("update", &[T::ByteArray, T::ByteArray, T::Any], T::Void, STATES_NOTIFY, 0),
    MethodSignature::unsafe_method("destroy", &[], T::Void, STATES_NOTIFY, 1 << 15),
];

const STD_LIB: &[MethodSignature] = &[
    MethodSignature::safe("serialize", &[T::Any], T::ByteArray, NONE, 1 << 12),
    MethodSignature::safe("deserialize", &[T::ByteArray], T::Any, NONE, 1 << 14),
    MethodSignature::safe("jsonSerialize", &[T::Any], T::ByteArray, NONE, 1 << 12),
    MethodSignature::safe("jsonDeserialize", &[T::ByteArray], T::Any, NONE, 1 << 14),
    MethodSignature::safe("itoa", &[T::Integer], T::String, NONE, 1 << 12),
    MethodSignature::safe("itoa", &[T::Integer, T::Integer], T::String, NONE, 1 << 12),
    MethodSignature::safe("atoi", &[T::String], T::Integer, NONE, 1 << 6),
    MethodSignature::safe("atoi", &[T::String, T::Integer], T::Integer, NONE, 1 << 6),
    MethodSignature::safe("base64Encode", &[T::ByteArray], T::String, NONE, 1 << 5),
    MethodSignature::safe("base64Decode", &[T::String], T::ByteArray, NONE, 1 << 5),
    MethodSignature::safe("base58Encode", &[T::ByteArray], T::String, NONE, 1 << 13),
    MethodSignature::safe("base58Decode", &[T::String], T::ByteArray, NONE, 1 << 10),
    MethodSignature::safe("base58CheckEncode", &[T::ByteArray], T::String, NONE, 1 << 16),
    MethodSignature::safe("base58CheckDecode", &[T::String], T::ByteArray, NONE, 1 << 16),
    MethodSignature::safe("memoryCompare", &[T::ByteArray, T::ByteArray], T::Integer, NONE, 1 << 5),
    MethodSignature::safe("memorySearch", &[T::ByteArray, T::ByteArray], T::Integer, NONE, 1 << 6),
    MethodSignature::safe("memorySearch", &[T::ByteArray, T::ByteArray, T::Integer], T::Integer, NONE, 1 << 6),
    MethodSignature::safe("memorySearch", &[T::ByteArray, T::ByteArray, T::Integer, T::Boolean], T::Integer, NONE, 1 << 6),
    MethodSignature::safe("stringSplit", &[T::String, T::String], T::Array, NONE, 1 << 8),
    MethodSignature::safe("stringSplit", &[T::String, T::String, T::Boolean], T::Array, NONE, 1 << 8),
    MethodSignature::safe("strLen", &[T::String], T::Integer, NONE, 1 << 8),
];

const CRYPTO_LIB: &[MethodSignature] = &[
    MethodSignature::safe("sha256", &[T::ByteArray], T::ByteArray, NONE, 1 << 15),
    MethodSignature::safe("ripemd160", &[T::ByteArray], T::ByteArray, NONE, 1 << 15),
    MethodSignature::safe("murmur32", &[T::ByteArray, T::Integer], T::ByteArray, NONE, 1 << 13),
    MethodSignature::safe("verifyWithECDsa", &[T::ByteArray, T::PublicKey, T::ByteArray, T::Integer], T::Boolean, NONE, 1 << 15),
    MethodSignature::safe("bls12381Serialize", &[T::InteropInterface], T::ByteArray, NONE, 1 << 19),
    MethodSignature::safe("bls12381Deserialize", &[T::ByteArray], T::InteropInterface, NONE, 1 << 19),
    MethodSignature::safe("bls12381Equal", &[T::InteropInterface, T::InteropInterface], T::Boolean, NONE, 1 << 5),
    MethodSignature::safe("bls12381Add", &[T::InteropInterface, T::InteropInterface], T::InteropInterface, NONE, 1 << 19),
    MethodSignature::safe("bls12381Mul", &[T::InteropInterface, T::ByteArray, T::Boolean], T::InteropInterface, NONE, 1 << 21),
    MethodSignature::safe("bls12381Pairing", &[T::InteropInterface, T::InteropInterface], T::InteropInterface, NONE, 1 << 23),
];

const LEDGER: &[MethodSignature] = &[
    MethodSignature::safe("currentHash", &[], T::Hash256, RS, 1 << 15),
    MethodSignature::safe("currentIndex", &[], T::Integer, RS, 1 << 15),
    MethodSignature::safe("getBlock", &[T::ByteArray], T::Array, RS, 1 << 15),
    MethodSignature::safe("getTransaction", &[T::Hash256], T::Array, RS, 1 << 15),
    MethodSignature::safe("getTransactionFromBlock", &[T::ByteArray, T::Integer], T::Array, RS, 1 << 16),
    MethodSignature::safe("getTransactionHeight", &[T::Hash256], T::Integer, RS, 1 << 15),
    MethodSignature::safe("getTransactionSigners", &[T::Hash256], T::Array, RS, 1 << 15),
    MethodSignature::safe("getTransactionVMState", &[T::Hash256], T::Integer, RS, 1 << 15),
];

const NEO_TOKEN: &[MethodSignature] = &[
    MethodSignature::safe("symbol", &[], T::String, NONE, 0),
    MethodSignature::safe("decimals", &[], T::Integer, NONE, 0),
    MethodSignature::safe("totalSupply", &[], T::Integer, RS, 1 << 15),
    MethodSignature::safe("balanceOf", &[T::Hash160], T::Integer, RS, 1 << 15),
    MethodSignature::unsafe_method("transfer", &[T::Hash160, T::Hash160, T::Integer, T::Any], T::Boolean, ALL, 1 << 17),
    MethodSignature::safe("unclaimedGas", &[T::Hash160, T::Integer], T::Integer, RS, 1 << 17),
    MethodSignature::unsafe_method("registerCandidate", &[T::PublicKey], T::Boolean, STATES, 0),
    MethodSignature::unsafe_method("unregisterCandidate", &[T::PublicKey], T::Boolean, STATES, 1 << 16),
    MethodSignature::unsafe_method("vote", &[T::Hash160, T::PublicKey], T::Boolean, STATES, 1 << 16),
    MethodSignature::safe("getCandidates", &[], T::Array, RS, 1 << 22),
    MethodSignature::safe("getAllCandidates", &[], T::InteropInterface, RS, 1 << 22),
    MethodSignature::safe("getCandidateVote", &[T::PublicKey], T::Integer, RS, 1 << 15),
    MethodSignature::safe("getCommittee", &[], T::Array, RS, 1 << 16),
    MethodSignature::safe("getNextBlockValidators", &[], T::Array, RS, 1 << 16),
    MethodSignature::safe("getGasPerBlock", &[], T::Integer, RS, 1 << 15),
    MethodSignature::unsafe_method("setGasPerBlock", &[T::Integer], T::Void, STATES, 1 << 15),
    MethodSignature::safe("getRegisterPrice", &[], T::Integer, RS, 1 << 15),
    MethodSignature::unsafe_method("setRegisterPrice", &[T::Integer], T::Void, STATES, 1 << 15),
    MethodSignature::safe("getAccountState", &[T::Hash160], T::Array, RS, 1 << 15),
];

const GAS_TOKEN: &[MethodSignature] = &[
    MethodSignature::safe("symbol", &[], T::String, NONE, 0),
    MethodSignature::safe("decimals", &[], T::Integer, NONE, 0),
    MethodSignature::safe("totalSupply", &[], T::Integer, RS, 1 << 15),
    MethodSignature::safe("balanceOf", &[T::Hash160], T::Integer, RS, 1 << 15),
    MethodSignature::unsafe_method("transfer", &[T::Hash160, T::Hash160, T::Integer, T::Any], T::Boolean, ALL, 1 << 17),
];

const POLICY: &[MethodSignature] = &[
    MethodSignature::safe("getFeePerByte", &[], T::Integer, RS, 1 << 15),
    MethodSignature::unsafe_method("setFeePerByte", &[T::Integer], T::Void, STATES, 1 << 15),
    MethodSignature::safe("getExecFeeFactor", &[], T::Integer, RS, 1 << 15),
    MethodSignature::unsafe_method("setExecFeeFactor", &[T::Integer], T::Void, STATES, 1 << 15),
    MethodSignature::safe("getStoragePrice", &[], T::Integer, RS, 1 << 15),
    MethodSignature::unsafe_method("setStoragePrice", &[T::Integer], T::Void, STATES, 1 << 15),
    MethodSignature::safe("isBlocked", &[T::Hash160], T::Boolean, RS, 1 << 15),
    MethodSignature::unsafe_method("blockAccount", &[T::Hash160], T::Boolean, STATES, 1 << 15),
    MethodSignature::unsafe_method("unblockAccount", &[T::Hash160], T::Boolean, STATES, 1 << 15),
    MethodSignature::safe("getAttributeFee", &[T::Integer], T::Integer, RS, 1 << 15),
    MethodSignature::unsafe_method("setAttributeFee", &[T::Integer, T::Integer], T::Void, STATES, 1 << 15),
];

const ROLE_MANAGEMENT: &[MethodSignature] = &[
    MethodSignature::safe("getDesignatedByRole", &[T::Integer, T::Integer], T::Array, RS, 1 << 15),
    MethodSignature::unsafe_method("designateAsRole", &[T::Integer, T::Array], T::Void, STATES_NOTIFY, 1 << 15),
];

const ORACLE: &[MethodSignature] = &[
    MethodSignature::safe("getPrice", &[], T::Integer, RS, 1 << 15),
    MethodSignature::unsafe_method("setPrice", &[T::Integer], T::Void, STATES, 1 << 15),
    MethodSignature::unsafe_method("request", &[T::String, T::String, T::String, T::Any, T::Integer], T::Void, STATES_NOTIFY, 0),
    MethodSignature::unsafe_method("finish", &[], T::Void, ALL, 0),
    MethodSignature::safe("verify", &[], T::Boolean, NONE, 1 << 15),
];

/// The native contracts known to both the compiler and the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NativeInterface {
    ContractManagement,
    StdLib,
    CryptoLib,
    Ledger,
    Neo,
    Gas,
    Policy,
    RoleManagement,
    Oracle,
}

impl NativeInterface {
    pub const ALL: [NativeInterface; 9] = [
        NativeInterface::ContractManagement,
        NativeInterface::StdLib,
        NativeInterface::CryptoLib,
        NativeInterface::Ledger,
        NativeInterface::Neo,
        NativeInterface::Gas,
        NativeInterface::Policy,
        NativeInterface::RoleManagement,
        NativeInterface::Oracle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NativeInterface::ContractManagement => "ContractManagement",
            NativeInterface::StdLib => "StdLib",
            NativeInterface::CryptoLib => "CryptoLib",
            NativeInterface::Ledger => "LedgerContract",
            NativeInterface::Neo => "NeoToken",
            NativeInterface::Gas => "GasToken",
            NativeInterface::Policy => "PolicyContract",
            NativeInterface::RoleManagement => "RoleManagement",
            NativeInterface::Oracle => "OracleContract",
        }
    }

    pub fn hash(self) -> UInt160 {
        match self {
            NativeInterface::ContractManagement => {
                UInt160::from_be_hex("fffdc93764dbaddd97c48f252a53ea4643faa3fd")
            }
            NativeInterface::StdLib => UInt160::from_be_hex("acce6fd80d44e1796aa0c2c625e9e4e0ce39efc0"),
            NativeInterface::CryptoLib => {
                UInt160::from_be_hex("726cb6e0cd8628a1350a611384688911ab75f51b")
            }
            NativeInterface::Ledger => UInt160::from_be_hex("da65b600f7124ce6c79950c1772a36403104f2be"),
            NativeInterface::Neo => UInt160::from_be_hex("ef4073a0f2b305a38ec4050e4d3d28bc40ea63f5"),
            NativeInterface::Gas => UInt160::from_be_hex("d2a4cff31913016155e38e474a2c06d08be276cf"),
            NativeInterface::Policy => UInt160::from_be_hex("cc5e4edd9f5f8dba8bb65734541df7a1c081c67b"),
            NativeInterface::RoleManagement => {
                UInt160::from_be_hex("49cf4e5378ffcd4dec034fd98a174c5491e395e2")
            }
            NativeInterface::Oracle => UInt160::from_be_hex("fe924b7cfe89ddd271abaf7210a80a7e11178758"),
        }
    }

    pub fn methods(self) -> &'static [MethodSignature] {
        match self {
            NativeInterface::ContractManagement => CONTRACT_MANAGEMENT,
            NativeInterface::StdLib => STD_LIB,
            NativeInterface::CryptoLib => CRYPTO_LIB,
            NativeInterface::Ledger => LEDGER,
            NativeInterface::Neo => NEO_TOKEN,
            NativeInterface::Gas => GAS_TOKEN,
            NativeInterface::Policy => POLICY,
            NativeInterface::RoleManagement => ROLE_MANAGEMENT,
            NativeInterface::Oracle => ORACLE,
        }
    }

    /// Looks up the overload of `method` taking `arity` parameters.
    pub fn find(self, method: &str, arity: usize) -> Option<&'static MethodSignature> {
        self.methods()
            .iter()
            .find(|m| m.name == method && m.arity() == arity)
    }

    /// All overloads declared under `method`.
    pub fn overloads(self, method: &str) -> impl Iterator<Item = &'static MethodSignature> + '_ {
        self.methods().iter().filter(move |m| m.name == method)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.name() == name)
    }

    pub fn from_hash(hash: &UInt160) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.hash() == *hash)
    }
}

impl std::fmt::Display for NativeInterface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn hashes_are_distinct_and_round_trip() {
        let hashes: HashSet<_> = NativeInterface::ALL.iter().map(|i| i.hash()).collect();
        assert_eq!(hashes.len(), NativeInterface::ALL.len());
        for iface in NativeInterface::ALL {
            assert_eq!(NativeInterface::from_hash(&iface.hash()), Some(iface));
            assert_eq!(NativeInterface::from_name(iface.name()), Some(iface));
        }
        assert_eq!(
            NativeInterface::Gas.hash().to_string(),
            "0xd2a4cff31913016155e38e474a2c06d08be276cf"
        );
    }

    #[test]
    fn overloads_are_keyed_by_arity() {
        for iface in NativeInterface::ALL {
            let mut seen = HashSet::new();
            for m in iface.methods() {
                assert!(seen.insert((m.name, m.arity())), "{iface}.{} duplicated", m.name);
                assert!(!m.name.starts_with('_') && m.name.len() <= 32);
                if m.safe {
                    assert!(!m.required_flags.intersects(CallFlags::WRITE_STATES | CallFlags::ALLOW_NOTIFY));
                }
            }
        }
        assert_eq!(NativeInterface::StdLib.overloads("memorySearch").count(), 3);
        assert!(NativeInterface::StdLib.find("itoa", 2).is_some());
        assert!(NativeInterface::StdLib.find("itoa", 3).is_none());
    }

    #[test]
    fn token_defaults() {
        let fee = NativeInterface::Policy.find("getFeePerByte", 0).unwrap();
        assert!(fee.has_return_value());
        assert_eq!(fee.default_token_flags(), CallFlags::READ_ONLY);

        let transfer = NativeInterface::Neo.find("transfer", 4).unwrap();
        assert_eq!(transfer.default_token_flags(), CallFlags::ALL);
        assert!(!NativeInterface::Policy.find("setFeePerByte", 1).unwrap().has_return_value());
    }
}
