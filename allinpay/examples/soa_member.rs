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

use allinpay::soa::{Client, Config, MemberType, Source};
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let ctx = allinpay::default_context();
    let client = Client::new(ctx.clone(), Config::from_env(&ctx).await?);

    let biz_user_id = std::env::args().nth(1).unwrap_or_else(|| "demo-user".to_string());

    // Creating an existing member is accepted and resolves its user id.
    let member = client
        .member()
        .create_member(&biz_user_id, MemberType::Person, Source::Mobile, 1)
        .await?;
    println!("member {} -> {}", member.biz_user_id, member.user_id);

    let info = client.member().get_member_info(&biz_user_id, 1).await?;
    println!("member info: {:?}", info.member_info);

    let balance = client.order().query_balance(&biz_user_id).await?;
    println!("balance: {} (frozen {})", balance.all_amount, balance.freezen_amount);

    let url = client
        .member()
        .sign_contract_url(&biz_user_id, "https://example.com/contract/done")?;
    println!("sign contract at: {url}");

    Ok(())
}
