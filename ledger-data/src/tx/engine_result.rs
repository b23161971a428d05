// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fmt;

use crate::{Error, Result};

/// Class of an engine result, decided by its code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCategory {
    /// `tel`, local error; not forwarded
    Local,
    /// `tem`, malformed transaction
    Malformed,
    /// `tef`, failed before being applied
    Failure,
    /// `ter`, may succeed if retried
    Retry,
    /// `tes`
    Success,
    /// `tec`, applied and fee claimed, but the intent failed
    Claimed,
}

macro_rules! engine_results {
    ($($variant:ident = $name:literal, $code:literal;)*) => {
        /// Outcome of applying a transaction.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum EngineResult {
            $($variant,)*
        }

        impl EngineResult {
            pub const ALL: &'static [EngineResult] =
                &[$(EngineResult::$variant,)*];

            pub const fn code(self) -> i32 {
                match self {
                    $(EngineResult::$variant => $code,)*
                }
            }

            /// Token such as `tesSUCCESS`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(EngineResult::$variant => $name,)*
                }
            }

            pub fn from_code(code: i32) -> Option<Self> {
                match code {
                    $($code => Some(EngineResult::$variant),)*
                    _ => None,
                }
            }

            pub fn from_name(name: &str) -> Result<Self> {
                match name {
                    $($name => Ok(EngineResult::$variant),)*
                    _ => Err(Error::UnknownType {
                        kind: "engine result",
                        value: name.to_string(),
                    }),
                }
            }
        }
    };
}

engine_results! {
    TelLocalError = "telLOCAL_ERROR", -399;
    TelBadDomain = "telBAD_DOMAIN", -398;
    TelBadPathCount = "telBAD_PATH_COUNT", -397;
    TelBadPublicKey = "telBAD_PUBLIC_KEY", -396;
    TelFailedProcessing = "telFAILED_PROCESSING", -395;
    TelInsufFeeP = "telINSUF_FEE_P", -394;
    TelNoDstPartial = "telNO_DST_PARTIAL", -393;

    TemMalformed = "temMALFORMED", -299;
    TemBadAmount = "temBAD_AMOUNT", -298;
    TemBadAuthMaster = "temBAD_AUTH_MASTER", -297;
    TemBadCurrency = "temBAD_CURRENCY", -296;
    TemBadExpiration = "temBAD_EXPIRATION", -295;
    TemBadFee = "temBAD_FEE", -294;
    TemBadIssuer = "temBAD_ISSUER", -293;
    TemBadLimit = "temBAD_LIMIT", -292;
    TemBadOffer = "temBAD_OFFER", -291;
    TemBadPath = "temBAD_PATH", -290;
    TemBadPathLoop = "temBAD_PATH_LOOP", -289;
    TemBadSendXrpLimit = "temBAD_SEND_XRP_LIMIT", -288;
    TemBadSendXrpMax = "temBAD_SEND_XRP_MAX", -287;
    TemBadSendXrpNoDirect = "temBAD_SEND_XRP_NO_DIRECT", -286;
    TemBadSendXrpPartial = "temBAD_SEND_XRP_PARTIAL", -285;
    TemBadSendXrpPaths = "temBAD_SEND_XRP_PATHS", -284;
    TemBadSequence = "temBAD_SEQUENCE", -283;
    TemBadSignature = "temBAD_SIGNATURE", -282;
    TemBadSrcAccount = "temBAD_SRC_ACCOUNT", -281;
    TemBadTransferRate = "temBAD_TRANSFER_RATE", -280;
    TemDstIsSrc = "temDST_IS_SRC", -279;
    TemDstNeeded = "temDST_NEEDED", -278;
    TemInvalid = "temINVALID", -277;
    TemInvalidFlag = "temINVALID_FLAG", -276;
    TemRedundant = "temREDUNDANT", -275;
    TemRedundantSendMax = "temREDUNDANT_SEND_MAX", -274;
    TemRippleEmpty = "temRIPPLE_EMPTY", -273;
    TemDisabled = "temDISABLED", -272;
    TemUncertain = "temUNCERTAIN", -271;
    TemUnknown = "temUNKNOWN", -270;

    TefFailure = "tefFAILURE", -199;
    TefAlready = "tefALREADY", -198;
    TefBadAddAuth = "tefBAD_ADD_AUTH", -197;
    TefBadAuth = "tefBAD_AUTH", -196;
    TefBadLedger = "tefBAD_LEDGER", -195;
    TefCreated = "tefCREATED", -194;
    TefDstTagNeeded = "tefDST_TAG_NEEDED", -193;
    TefException = "tefEXCEPTION", -192;
    TefInternal = "tefINTERNAL", -191;
    TefNoAuthRequired = "tefNO_AUTH_REQUIRED", -190;
    TefPastSeq = "tefPAST_SEQ", -189;
    TefWrongPrior = "tefWRONG_PRIOR", -188;
    TefMasterDisabled = "tefMASTER_DISABLED", -187;
    TefMaxLedger = "tefMAX_LEDGER", -186;

    TerRetry = "terRETRY", -99;
    TerFundsSpent = "terFUNDS_SPENT", -98;
    TerInsufFeeB = "terINSUF_FEE_B", -97;
    TerNoAccount = "terNO_ACCOUNT", -96;
    TerNoAuth = "terNO_AUTH", -95;
    TerNoLine = "terNO_LINE", -94;
    TerOwners = "terOWNERS", -93;
    TerPreSeq = "terPRE_SEQ", -92;
    TerLast = "terLAST", -91;
    TerNoRipple = "terNO_RIPPLE", -90;

    TesSuccess = "tesSUCCESS", 0;

    TecClaim = "tecCLAIM", 100;
    TecPathPartial = "tecPATH_PARTIAL", 101;
    TecUnfundedAdd = "tecUNFUNDED_ADD", 102;
    TecUnfundedOffer = "tecUNFUNDED_OFFER", 103;
    TecUnfundedPayment = "tecUNFUNDED_PAYMENT", 104;
    TecFailedProcessing = "tecFAILED_PROCESSING", 105;
    TecDirFull = "tecDIR_FULL", 121;
    TecInsufReserveLine = "tecINSUF_RESERVE_LINE", 122;
    TecInsufReserveOffer = "tecINSUF_RESERVE_OFFER", 123;
    TecNoDst = "tecNO_DST", 124;
    TecNoDstInsufXrp = "tecNO_DST_INSUF_XRP", 125;
    TecNoLineInsufReserve = "tecNO_LINE_INSUF_RESERVE", 126;
    TecNoLineRedundant = "tecNO_LINE_REDUNDANT", 127;
    TecPathDry = "tecPATH_DRY", 128;
    TecUnfunded = "tecUNFUNDED", 129;
    TecMasterDisabled = "tecMASTER_DISABLED", 130;
    TecNoRegularKey = "tecNO_REGULAR_KEY", 131;
    TecOwners = "tecOWNERS", 132;
    TecNoIssuer = "tecNO_ISSUER", 133;
    TecNoAuth = "tecNO_AUTH", 134;
    TecNoLine = "tecNO_LINE", 135;
    TecInsuffFee = "tecINSUFF_FEE", 136;
    TecFrozen = "tecFROZEN", 137;
    TecNoTarget = "tecNO_TARGET", 138;
    TecNoPermission = "tecNO_PERMISSION", 139;
    TecNoEntry = "tecNO_ENTRY", 140;
    TecInsufficientReserve = "tecINSUFFICIENT_RESERVE", 141;
}

impl EngineResult {
    pub fn category(self) -> ResultCategory {
        match self.code() {
            ..=-300 => ResultCategory::Local,
            -299..=-200 => ResultCategory::Malformed,
            -199..=-100 => ResultCategory::Failure,
            -99..=-1 => ResultCategory::Retry,
            0 => ResultCategory::Success,
            _ => ResultCategory::Claimed,
        }
    }

    pub fn is_success(self) -> bool {
        self == EngineResult::TesSuccess
    }

    /// Whether the transaction made it into a ledger (`tes` or `tec`).
    pub fn is_applied(self) -> bool {
        matches!(
            self.category(),
            ResultCategory::Success | ResultCategory::Claimed
        )
    }
}

impl fmt::Display for EngineResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
