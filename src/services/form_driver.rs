//! 下单表单服务 - 业务能力层
//!
//! 只负责把一个订单填进表单并提交，不关心收据和恢复
//!
//! 状态流转：
//! `NotStarted → FieldsFilled → Previewed → Submitted`，任一步失败即中止本次尝试。
//! `Confirmed` 由收据出现后的流程层标记。

use std::fmt;

use tracing::{debug, info, warn};

use crate::config::Timeouts;
use crate::error::{FormError, PageError};
use crate::infrastructure::PageDriver;
use crate::models::OrderRecord;

/// 表单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    NotStarted,
    FieldsFilled,
    Previewed,
    Submitted,
    Confirmed,
}

impl fmt::Display for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormState::NotStarted => "NotStarted",
            FormState::FieldsFilled => "FieldsFilled",
            FormState::Previewed => "Previewed",
            FormState::Submitted => "Submitted",
            FormState::Confirmed => "Confirmed",
        };
        f.write_str(name)
    }
}

/// 表单操作步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStep {
    SelectHead,
    SelectBody,
    FillLegs,
    FillAddress,
    Preview,
    Submit,
}

impl fmt::Display for FormStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormStep::SelectHead => "选择头部",
            FormStep::SelectBody => "选择身体",
            FormStep::FillLegs => "填写腿部编号",
            FormStep::FillAddress => "填写地址",
            FormStep::Preview => "预览",
            FormStep::Submit => "提交订单",
        };
        f.write_str(name)
    }
}

/// 表单上的固定选择器
pub mod selectors {
    use crate::infrastructure::Selector;

    pub fn head() -> Selector {
        Selector::css("select[name='head']")
    }

    pub fn body(value: &str) -> Selector {
        Selector::css(format!("input[name='body'][value='{}']", value))
    }

    pub fn legs() -> Selector {
        Selector::css("input.form-control[placeholder='Enter the part number for the legs']")
    }

    pub fn address() -> Selector {
        Selector::css("input[id='address']")
    }

    pub fn preview() -> Selector {
        Selector::css("button[id='preview']")
    }

    pub fn order() -> Selector {
        Selector::css("button[id='order']")
    }

    /// 导航栏中的 "Order your robot!" 链接
    pub fn order_form_link() -> Selector {
        Selector::css("a.nav-link.active[href='#/robot-order']")
    }
}

/// 下单表单服务
pub struct FormDriver {
    body_timeout: std::time::Duration,
    order_button_timeout: std::time::Duration,
}

impl FormDriver {
    pub fn new(timeouts: &Timeouts) -> Self {
        Self {
            body_timeout: timeouts.body,
            order_button_timeout: timeouts.order_button,
        }
    }

    /// 填写并提交一个订单
    ///
    /// 每个订单只提交一次，成功时返回 [`FormState::Submitted`]
    pub async fn fill_and_submit<P: PageDriver + ?Sized>(
        &self,
        page: &P,
        order: &OrderRecord,
    ) -> Result<FormState, FormError> {
        let mut state = FormState::NotStarted;

        // 1. 头部下拉框
        page.select_option(&selectors::head(), &order.head)
            .await
            .map_err(fail(state, FormStep::SelectHead))?;

        // 2. 身体单选框，需要等待渲染
        let body = selectors::body(&order.body);
        page.wait_for(&body, self.body_timeout)
            .await
            .map_err(fail(state, FormStep::SelectBody))?;
        page.click(&body)
            .await
            .map_err(fail(state, FormStep::SelectBody))?;

        // 3. 腿部编号和地址
        page.fill(&selectors::legs(), &order.legs)
            .await
            .map_err(fail(state, FormStep::FillLegs))?;
        page.fill(&selectors::address(), &order.address)
            .await
            .map_err(fail(state, FormStep::FillAddress))?;
        state = FormState::FieldsFilled;
        debug!("表单字段已填写: {}", order.order_number);

        // 4. 预览，下单按钮出现即视为预览成功
        page.click(&selectors::preview())
            .await
            .map_err(fail(state, FormStep::Preview))?;
        page.wait_for(&selectors::order(), self.order_button_timeout)
            .await
            .map_err(fail(state, FormStep::Preview))?;
        state = FormState::Previewed;

        // 5. 提交
        self.submit_order(page, state).await
    }

    /// 点击下单按钮，然后总是点击导航栏链接回到下单页
    ///
    /// 站点会随机拒绝提交，提交后一律按"被回弹"记录，不在这里重试。
    /// 导航栏链接点不到只记警告，已提交的订单仍交给收据步骤。
    async fn submit_order<P: PageDriver + ?Sized>(
        &self,
        page: &P,
        state: FormState,
    ) -> Result<FormState, FormError> {
        let submitted = page.click(&selectors::order()).await;

        if let Err(e) = page.click(&selectors::order_form_link()).await {
            warn!("⚠️ 点击返回下单页链接失败: {}", e);
        }

        match submitted {
            Ok(()) => {
                warn!("订单提交后被站点回弹，已尝试点击返回下单页链接");
                info!("📤 订单已提交");
                Ok(FormState::Submitted)
            }
            Err(source) => Err(FormError {
                state,
                step: FormStep::Submit,
                source,
            }),
        }
    }
}

fn fail(state: FormState, step: FormStep) -> impl Fn(PageError) -> FormError {
    move |source| FormError {
        state,
        step,
        source,
    }
}
