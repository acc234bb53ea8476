// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use allinpay::syb::{Client, Config};
use allinpay::time::{format_date, now};
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let ctx = allinpay::default_context();
    let client = Client::new(ctx.clone(), Config::from_env(&ctx).await?);

    let today = format_date(now());
    let complaints = client
        .complaint()
        .complaint_qry(&today, &today, None, None)
        .await?;
    println!("{}", serde_json::to_string_pretty(&complaints)?);

    Ok(())
}
