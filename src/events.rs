use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{InputField, RepaymentType};

/// usage events emitted by a calculator, for analytics consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CalculatorEvent {
    CalculatorOpened,
    InputChanged {
        field: InputField,
    },
    InputRejected {
        field: InputField,
        input: String,
    },
    CalculationCompleted {
        repayment_type: RepaymentType,
        loan_amount: Money,
        monthly_repayment: Money,
        lvr: Decimal,
    },
    ValidationFailed {
        fields: Vec<InputField>,
    },
    CalculatorReset,
}

/// event store for collecting events during operations
#[derive(Debug, Default, Clone)]
pub struct EventStore {
    events: Vec<CalculatorEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: CalculatorEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<CalculatorEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[CalculatorEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_events_drains() {
        let mut store = EventStore::new();
        store.emit(CalculatorEvent::CalculatorOpened);
        store.emit(CalculatorEvent::InputChanged { field: InputField::Deposit });
        assert_eq!(store.events().len(), 2);

        let taken = store.take_events();
        assert_eq!(taken.len(), 2);
        assert!(store.events().is_empty());
    }

    #[test]
    fn test_events_serialize() {
        let event = CalculatorEvent::ValidationFailed {
            fields: vec![InputField::InterestRate],
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"ValidationFailed":{"fields":["interestRate"]}}"#);
    }
}
