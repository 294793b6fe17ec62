// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

mod cse;
mod parser;
