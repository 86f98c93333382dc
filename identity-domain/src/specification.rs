/// 规约模式的核心 trait
///
/// 内存存储把编译后的谓词树翻译为规约链，对候选记录逐条求值
pub trait Specification<T> {
    /// 检查候选对象是否满足规约
    fn is_satisfied_by(&self, candidate: &T) -> bool;
}

impl<T> Specification<T> for Box<dyn Specification<T>> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.as_ref().is_satisfied_by(candidate)
    }
}

/// 全部满足；空列表恒为真
pub struct AllOf<T> {
    specs: Vec<Box<dyn Specification<T>>>,
}

impl<T> AllOf<T> {
    pub fn new(specs: Vec<Box<dyn Specification<T>>>) -> Self {
        Self { specs }
    }
}

impl<T> Specification<T> for AllOf<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.specs.iter().all(|s| s.is_satisfied_by(candidate))
    }
}

/// 任一满足；空列表恒为假
pub struct AnyOf<T> {
    specs: Vec<Box<dyn Specification<T>>>,
}

impl<T> AnyOf<T> {
    pub fn new(specs: Vec<Box<dyn Specification<T>>>) -> Self {
        Self { specs }
    }
}

impl<T> Specification<T> for AnyOf<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.specs.iter().any(|s| s.is_satisfied_by(candidate))
    }
}

/// 以闭包表达的规约
pub struct FnSpecification<F>(F);

pub fn from_fn<F>(f: F) -> FnSpecification<F> {
    FnSpecification(f)
}

impl<T, F> Specification<T> for FnSpecification<F>
where
    F: Fn(&T) -> bool,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        (self.0)(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lists_follow_sql_identities() {
        assert!(AllOf::<i32>::new(vec![]).is_satisfied_by(&1));
        assert!(!AnyOf::<i32>::new(vec![]).is_satisfied_by(&1));
    }

    #[test]
    fn closures_compose_with_lists() {
        let even: Box<dyn Specification<i32>> = Box::new(from_fn(|n: &i32| n % 2 == 0));
        let positive: Box<dyn Specification<i32>> = Box::new(from_fn(|n: &i32| *n > 0));
        let spec = AllOf::new(vec![even, positive]);
        assert!(spec.is_satisfied_by(&4));
        assert!(!spec.is_satisfied_by(&-4));
        assert!(!spec.is_satisfied_by(&3));
    }
}
