// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//registry
pub const ENV_TZKIT_DEFAULT_ZONE: &str = "TZKIT_DEFAULT_ZONE";
pub const ENV_TZ: &str = "TZ";

//security
pub const ENV_TZKIT_ADMIN_DENY: &str = "TZKIT_ADMIN_DENY";

//log
pub const ENV_TZKIT_LOG: &str = "TZKIT_LOG";
