//! End-to-end swap scenarios through the wired orchestrator

use std::sync::Arc;
use std::time::Duration;

use xswap::{
	Amount, DynamicSwapAction, ExecutionResult, ProcessContext, ProviderClass, StepMetadata,
	StepType, SubmitStepParams, SwapErrorKind, SwapPair, SwapRequest, TransactionPayload,
	ValidateSwapParams,
};

mod mocks;

use mocks::chain::{
	InMemoryChain, DOT, ETH, EVM_USER, HDX, SUBSTRATE_USER, USDC, USDT, USDT_AH, WETH,
};
use mocks::configs::MockConfigs;
use mocks::providers::{MockQuoteApi, ROUTER};

fn ethereum_chain() -> Arc<InMemoryChain> {
	let pair = SwapPair::new(USDC, WETH);
	Arc::new(
		InMemoryChain::standard()
			.balance("ethereum", USDC, 5_000, true)
			.balance("ethereum", ETH, 1_000_000, true)
			.path(&pair, vec![DynamicSwapAction::swap(USDC, WETH)]),
	)
}

fn usdc_to_weth() -> SwapRequest {
	SwapRequest::new(EVM_USER, SwapPair::new(USDC, WETH), Amount::from(1000u64))
}

#[tokio::test]
async fn test_direct_swap_picks_best_quote() {
	let chain = ethereum_chain();
	let uniswap = MockQuoteApi::amm("uniswap", 950);
	let sushiswap = MockQuoteApi::amm("sushiswap", 980);
	let settings = MockConfigs::settings(vec![
		MockConfigs::provider("uniswap", ProviderClass::Amm, &["ethereum"]),
		MockConfigs::provider("sushiswap", ProviderClass::Amm, &["ethereum"]),
	]);
	let orchestrator = MockConfigs::orchestrator(
		&chain,
		settings,
		vec![
			("uniswap", uniswap.clone().shared()),
			("sushiswap", sushiswap.clone().shared()),
		],
	);
	let request = usdc_to_weth();

	let plan = orchestrator.plan_swap(&request).await.unwrap();
	let quote = plan.quote.clone().unwrap();
	assert_eq!(quote.provider, "sushiswap");
	assert_eq!(quote.to_amount, Amount::from(980u64));
	assert_eq!(plan.quotes.len(), 2);
	assert_eq!(
		plan.process.step_types(),
		vec![StepType::Default, StepType::Swap]
	);
	assert_eq!(uniswap.call_count(), 1);
	assert_eq!(sushiswap.call_count(), 1);

	let errors = orchestrator
		.validate_swap(&ValidateSwapParams {
			request: request.clone(),
			process: plan.process.clone(),
			quote: quote.clone(),
		})
		.await;
	assert!(errors.is_empty(), "unexpected errors: {errors:?}");

	let mut context = ProcessContext::for_process(&plan.process);
	let result = orchestrator
		.submit_step(
			&SubmitStepParams {
				request,
				process: plan.process,
				quote,
				step_index: 1,
			},
			&mut context,
		)
		.await
		.unwrap();
	let ExecutionResult::ReadyToSign {
		payload: TransactionPayload::Evm(tx),
	} = result
	else {
		panic!("expected an EVM transaction");
	};
	assert_eq!(tx.to, ROUTER);
	assert_eq!(tx.from, EVM_USER);
}

#[tokio::test]
async fn test_bridge_top_up_short_of_balance() {
	let pair = SwapPair::new(USDT, DOT).with_alternative(USDT_AH);
	let chain = Arc::new(
		InMemoryChain::standard()
			.balance("hydradx_main", USDT, 100, true)
			.balance("hydradx_main", HDX, 1_000, true)
			.balance("statemint", USDT_AH, 850, true)
			.path(
				&pair,
				vec![
					DynamicSwapAction::bridge(USDT_AH, USDT),
					DynamicSwapAction::swap(USDT, DOT),
				],
			),
	);
	let hydration = MockQuoteApi::hub("hydration", 400);
	let orchestrator = MockConfigs::orchestrator(
		&chain,
		MockConfigs::settings(vec![MockConfigs::provider(
			"hydration",
			ProviderClass::Hub,
			&["hydradx_main", "statemint"],
		)]),
		vec![("hydration", hydration.shared())],
	);
	let request = SwapRequest::new(SUBSTRATE_USER, pair, Amount::from(1000u64));

	let plan = orchestrator.plan_swap(&request).await.unwrap();
	assert_eq!(
		plan.process.step_types(),
		vec![StepType::Default, StepType::Bridge, StepType::Swap]
	);
	let StepMetadata::Bridge(bridge) = &plan.process.steps[1].step.metadata else {
		panic!("expected a bridge step");
	};
	assert_eq!(bridge.amount, Amount::from(960u64));
	assert!(bridge.fee_included);
	let StepMetadata::Swap(swap) = &plan.process.steps[2].step.metadata else {
		panic!("expected a swap step");
	};
	assert_eq!(swap.from_amount, Amount::from(1000u64));

	let errors = orchestrator
		.validate_swap(&ValidateSwapParams {
			request,
			process: plan.process,
			quote: plan.quote.unwrap(),
		})
		.await;
	assert_eq!(errors.len(), 1);
	assert_eq!(errors[0].kind, SwapErrorKind::NotEnoughBalance);
}

#[tokio::test]
async fn test_order_book_quote_expires_before_submit() {
	let chain = ethereum_chain();
	let cowswap = MockQuoteApi::rfq("cowswap", 990).alive_for_ms(300);
	let orchestrator = MockConfigs::orchestrator(
		&chain,
		MockConfigs::settings(vec![MockConfigs::provider(
			"cowswap",
			ProviderClass::Rfq,
			&["ethereum"],
		)]),
		vec![("cowswap", cowswap.shared())],
	);
	let request = usdc_to_weth();

	let plan = orchestrator.plan_swap(&request).await.unwrap();
	let quote = plan.quote.unwrap();
	assert_eq!(quote.provider, "cowswap");

	tokio::time::sleep(Duration::from_millis(400)).await;

	let errors = orchestrator
		.validate_swap(&ValidateSwapParams {
			request: request.clone(),
			process: plan.process.clone(),
			quote: quote.clone(),
		})
		.await;
	assert_eq!(errors.len(), 1);
	assert_eq!(errors[0].kind, SwapErrorKind::QuoteTimeout);

	let mut context = ProcessContext::for_process(&plan.process);
	let err = orchestrator
		.submit_step(
			&SubmitStepParams {
				request,
				process: plan.process,
				quote,
				step_index: 1,
			},
			&mut context,
		)
		.await
		.unwrap_err();
	assert_eq!(err.kind, SwapErrorKind::QuoteTimeout);
}

#[tokio::test]
async fn test_order_book_signature_then_fill() {
	let chain = ethereum_chain();
	let cowswap = MockQuoteApi::rfq("cowswap", 990).filling_after(2);
	let orchestrator = MockConfigs::orchestrator(
		&chain,
		MockConfigs::settings(vec![MockConfigs::provider(
			"cowswap",
			ProviderClass::Rfq,
			&["ethereum"],
		)]),
		vec![("cowswap", cowswap.clone().shared())],
	);
	let request = usdc_to_weth();
	let plan = orchestrator.plan_swap(&request).await.unwrap();
	assert_eq!(
		plan.process.step_types(),
		vec![StepType::Default, StepType::Permit, StepType::Swap]
	);
	let quote = plan.quote.unwrap();
	let params = |step_index| SubmitStepParams {
		request: request.clone(),
		process: plan.process.clone(),
		quote: quote.clone(),
		step_index,
	};
	let mut context = ProcessContext::for_process(&plan.process);

	let result = orchestrator.submit_step(&params(1), &mut context).await.unwrap();
	assert!(matches!(
		result,
		ExecutionResult::SignatureRequired {
			payload: TransactionPayload::OffChainSign(_)
		}
	));

	context
		.record_signature(StepType::Permit, "0xsigned")
		.unwrap();
	let result = orchestrator.submit_step(&params(2), &mut context).await.unwrap();
	assert!(matches!(result, ExecutionResult::OrderFilled { .. }));
	assert_eq!(cowswap.poll_count(), 3);

	let relayed = cowswap.relayed_orders();
	assert_eq!(relayed.len(), 1);
	assert_eq!(relayed[0].signature, "0xsigned");
	assert!(context.signature(StepType::Permit).is_none());
}

fn hydradx_chain() -> Arc<InMemoryChain> {
	let pair = SwapPair::new(USDT, DOT);
	Arc::new(
		InMemoryChain::standard()
			.balance("hydradx_main", USDT, 5_000, true)
			.balance("hydradx_main", HDX, 1_000, true)
			.path(&pair, vec![DynamicSwapAction::swap(USDT, DOT)]),
	)
}

async fn validate_hub_swap(recipient: &str) -> Vec<xswap::SwapError> {
	let chain = hydradx_chain();
	let orchestrator = MockConfigs::orchestrator(
		&chain,
		MockConfigs::settings(vec![MockConfigs::provider(
			"hydration",
			ProviderClass::Hub,
			&["hydradx_main"],
		)]),
		vec![("hydration", MockQuoteApi::hub("hydration", 400).shared())],
	);
	let request = SwapRequest::new(
		SUBSTRATE_USER,
		SwapPair::new(USDT, DOT),
		Amount::from(1000u64),
	)
	.with_recipient(recipient);

	let plan = orchestrator.plan_swap(&request).await.unwrap();
	orchestrator
		.validate_swap(&ValidateSwapParams {
			request,
			process: plan.process,
			quote: plan.quote.unwrap(),
		})
		.await
}

#[tokio::test]
async fn test_evm_recipient_on_substrate_destination() {
	let errors = validate_hub_swap(EVM_USER).await;
	assert_eq!(errors.len(), 1);
	assert_eq!(errors[0].kind, SwapErrorKind::InvalidRecipient);
}

#[tokio::test]
async fn test_substrate_recipient_on_substrate_destination() {
	let errors = validate_hub_swap(SUBSTRATE_USER).await;
	assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}
